use std::process::ExitCode;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use gradebook::cli::{self, Cli};

/// Environment variable that overrides the log filter.
const LOG_ENV: &str = "GRADEBOOK_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN // Default to less noise
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
