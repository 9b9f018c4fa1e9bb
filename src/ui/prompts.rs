//! ui::prompts
//!
//! Line-based prompts over any buffered reader.
//!
//! # Design
//!
//! A [`Prompter`] reads one answer per line. Typed prompts re-ask until
//! the answer parses, printing the parse error each time. End of input is
//! reported as [`PromptError::Eof`] so callers can stop cleanly instead of
//! looping forever on a closed stdin.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use super::output::Output;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("end of input")]
    Eof,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Reads answers from `input`, writing prompts to an [`Output`].
#[derive(Debug)]
pub struct Prompter<R: BufRead> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Prompt for a line of text, returned trimmed.
    ///
    /// # Errors
    ///
    /// `PromptError::Eof` when the input is exhausted.
    pub fn text<W: Write>(
        &mut self,
        out: &mut Output<W>,
        message: &str,
    ) -> Result<String, PromptError> {
        out.prompt(format_args!("{}: ", message))?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim().to_string())
    }

    /// Prompt until the answer parses as `T`.
    ///
    /// # Errors
    ///
    /// `PromptError::Eof` when the input is exhausted.
    pub fn parse<T, W>(&mut self, out: &mut Output<W>, message: &str) -> Result<T, PromptError>
    where
        T: FromStr,
        T::Err: Display,
        W: Write,
    {
        loop {
            let answer = self.text(out, message)?;
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(e) => out.error(e)?,
            }
        }
    }

    /// Like [`Prompter::parse`], but a blank answer means "no value".
    ///
    /// # Errors
    ///
    /// `PromptError::Eof` when the input is exhausted.
    pub fn optional<T, W>(
        &mut self,
        out: &mut Output<W>,
        message: &str,
    ) -> Result<Option<T>, PromptError>
    where
        T: FromStr,
        T::Err: Display,
        W: Write,
    {
        loop {
            let answer = self.text(out, message)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => out.error(e)?,
            }
        }
    }

    /// Prompt until the answer passes `convert`.
    ///
    /// # Errors
    ///
    /// `PromptError::Eof` when the input is exhausted.
    pub fn parse_with<T, E, W>(
        &mut self,
        out: &mut Output<W>,
        message: &str,
        convert: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T, PromptError>
    where
        E: Display,
        W: Write,
    {
        loop {
            let answer = self.text(out, message)?;
            match convert(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => out.error(e)?,
            }
        }
    }

    /// Prompt for yes/no. A blank answer takes `default`.
    ///
    /// # Errors
    ///
    /// `PromptError::Eof` when the input is exhausted.
    pub fn confirm<W: Write>(
        &mut self,
        out: &mut Output<W>,
        message: &str,
        default: bool,
    ) -> Result<bool, PromptError> {
        let hint = if default { "Y/n" } else { "y/N" };
        let message = format!("{} [{}]", message, hint);
        self.parse_with(out, &message, |answer| {
            match answer.to_ascii_lowercase().as_str() {
                "" => Ok(default),
                "y" | "yes" => Ok(true),
                "n" | "no" => Ok(false),
                other => Err(format!("expected y or n, got '{}'", other)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::output::Verbosity;
    use std::io::Cursor;

    fn session(input: &str) -> (Prompter<Cursor<Vec<u8>>>, Output<Vec<u8>>) {
        (
            Prompter::new(Cursor::new(input.as_bytes().to_vec())),
            Output::new(Vec::new(), Verbosity::Normal),
        )
    }

    #[test]
    fn text_trims_answer() {
        let (mut prompter, mut out) = session("  Ada Lovelace \n");
        assert_eq!(prompter.text(&mut out, "Name").unwrap(), "Ada Lovelace");
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "Name: ");
    }

    #[test]
    fn parse_reasks_until_valid() {
        let (mut prompter, mut out) = session("abc\n42\n");
        let value: u32 = prompter.parse(&mut out, "Id").unwrap();
        assert_eq!(value, 42);

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("error: invalid digit"));
        assert_eq!(text.matches("Id: ").count(), 2);
    }

    #[test]
    fn eof_is_reported() {
        let (mut prompter, mut out) = session("oops\n");
        let result: Result<u32, _> = prompter.parse(&mut out, "Id");
        assert!(matches!(result, Err(PromptError::Eof)));
    }

    #[test]
    fn optional_blank_is_none() {
        let (mut prompter, mut out) = session("\n7\n");
        assert_eq!(prompter.optional::<u32, _>(&mut out, "Group").unwrap(), None);
        assert_eq!(prompter.optional::<u32, _>(&mut out, "Group").unwrap(), Some(7));
    }

    #[test]
    fn confirm_uses_default_on_blank() {
        let (mut prompter, mut out) = session("\nmaybe\nn\n");
        assert!(prompter.confirm(&mut out, "Seed", true).unwrap());
        assert!(!prompter.confirm(&mut out, "Seed", true).unwrap());
    }
}
