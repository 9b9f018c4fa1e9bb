//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Read configuration from this file
//! - `--storage <kind>`: Override the configured storage kind
//! - `--data-dir <path>`: Override the configured data directory
//! - `--history-limit <n>`: Cap the number of undoable operations
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::config::{ConfigOverrides, StorageKind};

/// Gradebook - students, assignments and grades with undo/redo
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend to use instead of the configured one
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageArg>,

    /// Directory holding the data files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Maximum number of operations kept for undo
    #[arg(long, global = true)]
    pub history_limit: Option<usize>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print results and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Configuration values given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            storage: self.storage.map(StorageKind::from),
            data_dir: self.data_dir.clone(),
            history_limit: self.history_limit,
        }
    }
}

/// Storage backends selectable with `--storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Memory,
    Text,
    Json,
}

impl From<StorageArg> for StorageKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Memory => StorageKind::Memory,
            StorageArg::Text => StorageKind::Text,
            StorageArg::Json => StorageKind::Json,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the interactive menu (default)
    #[command(
        long_about = "Start the interactive menu.\n\n\
            Every change made in the menu can be undone and redone for the rest \
            of the session. Answers are read one per line, so a session can also \
            be scripted by piping input.",
        after_help = "\
EXAMPLES:
    # Work on the configured store
    gradebook shell

    # Try it out on generated data
    gradebook --storage memory shell --sample

    # Scripted: list students, then exit
    printf '1\\n4\\n0\\n' | gradebook -q shell"
    )]
    Shell {
        /// Fill an empty store with generated students and assignments
        #[arg(long)]
        sample: bool,

        /// Number of generated students and assignments
        #[arg(long, value_name = "N", requires = "sample")]
        sample_size: Option<usize>,

        /// Seed for the generator, for repeatable data
        #[arg(long, value_name = "SEED", requires = "sample")]
        seed: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Default for Command {
    fn default() -> Self {
        Command::Shell {
            sample: false,
            sample_size: None,
            seed: None,
        }
    }
}
