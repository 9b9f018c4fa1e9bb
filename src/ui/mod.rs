//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Line-based typed prompts
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! The UI module provides a consistent interface for user interaction.
//! Both halves are generic over their reader and writer, so the shell can
//! be driven from a script in tests exactly as from a terminal.

pub mod output;
pub mod prompts;
