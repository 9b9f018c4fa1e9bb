//! cli
//!
//! Command-line interface layer for the gradebook.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and apply flag overrides
//! - Open the configured storage and start the menu session
//!
//! # Architecture
//!
//! The CLI layer is thin. It wires repositories, the operation log and the
//! services together, then hands control to the [`shell::Shell`]. All
//! state changes flow through [`crate::service`].

pub mod args;
pub mod shell;

pub use args::{Cli, Command};
pub use shell::Shell;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::config::Config;
use crate::history::OperationLog;
use crate::service::{sample, Gradebook};
use crate::store::Repositories;
use crate::ui::output::{Output, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let config = load_config(&cli, &cwd, verbosity)?;

    match cli.command.clone().unwrap_or_default() {
        Command::Config => {
            let rendered = config.to_toml()?;
            let mut out = Output::new(io::stdout().lock(), verbosity);
            if let Some(path) = config.loaded_from() {
                out.print(format_args!("# loaded from {}", path.display()))?;
            }
            out.line(rendered.trim_end())?;
            Ok(())
        }
        Command::Shell {
            sample,
            sample_size,
            seed,
        } => {
            let repos = Repositories::open(config.storage()).with_context(|| {
                format!("failed to open {} storage", config.storage_kind())
            })?;

            let mut out = Output::new(io::stdout().lock(), verbosity);
            if sample {
                seed_sample(&repos, &mut out, sample_size.unwrap_or(config.sample_size()), seed)?;
            }

            let book = Gradebook::new(repos, OperationLog::shared(config.history_limit()));
            let today = chrono::Local::now().date_naive();
            let mut shell = Shell::new(book, io::stdin().lock(), out, today);
            shell.run().context("shell session failed")?;
            Ok(())
        }
    }
}

fn load_config(cli: &Cli, cwd: &Path, verbosity: Verbosity) -> Result<Config> {
    let loaded = Config::load(cli.config.as_deref(), cwd)?;
    let mut config = loaded.config;
    for warning in loaded.warnings {
        Output::new(io::stderr(), verbosity)
            .warn(format_args!("{} ({})", warning.message, warning.path.display()))?;
    }
    config.apply_overrides(&cli.overrides())?;
    tracing::debug!(
        storage = %config.storage_kind(),
        history_limit = ?config.history_limit(),
        "configuration ready"
    );
    Ok(config)
}

/// Fill an empty store with generated data.
fn seed_sample<W: io::Write>(
    repos: &Repositories,
    out: &mut Output<W>,
    size: usize,
    seed: Option<u64>,
) -> Result<()> {
    if !repos.is_empty() {
        out.warn("store is not empty, skipping sample data")?;
        return Ok(());
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let today = chrono::Local::now().date_naive();
    let summary = sample::generate(repos, &mut rng, size, today)
        .context("failed to generate sample data")?;
    out.success(format_args!(
        "Generated {} students, {} assignments and {} grade entries.",
        summary.students, summary.assignments, summary.grades
    ))?;
    Ok(())
}
