//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! All user-facing text goes through [`Output`], which owns the writer and
//! the verbosity level. The binary hands it stdout; tests hand it a
//! `Vec<u8>`.
//!
//! Report lines ([`Output::line`]) and errors are always written. Menus,
//! prompts and confirmations are dropped in quiet mode so piped sessions
//! print only results.

use std::fmt::Display;
use std::io::{self, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - results and errors only
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Writer paired with a verbosity level.
#[derive(Debug)]
pub struct Output<W: Write> {
    writer: W,
    verbosity: Verbosity,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, verbosity: Verbosity) -> Self {
        Self { writer, verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print a message (respects quiet mode).
    pub fn print(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        writeln!(self.writer, "{}", message)
    }

    /// Print a result line (always shown).
    pub fn line(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }

    /// Print one result line per item (always shown).
    pub fn list<T: Display>(&mut self, items: &[T], prefix: &str) -> io::Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", format_list(items, prefix))
    }

    /// Print a debug message (only in debug mode).
    pub fn debug(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity != Verbosity::Debug {
            return Ok(());
        }
        writeln!(self.writer, "[debug] {}", message)
    }

    /// Print an error message (always shown).
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.writer, "error: {}", message)
    }

    /// Print a warning message (respects quiet mode).
    pub fn warn(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        writeln!(self.writer, "warning: {}", message)
    }

    /// Print a success message (respects quiet mode).
    pub fn success(&mut self, message: impl Display) -> io::Result<()> {
        self.print(message)
    }

    /// Print a prompt without a trailing newline (respects quiet mode).
    pub fn prompt(&mut self, message: impl Display) -> io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        write!(self.writer, "{}", message)?;
        self.writer.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the output, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
