//! Gradebook - students, assignments and grades with undo/redo
//!
//! A console gradebook whose every change can be undone and redone for the
//! rest of the session.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface and the interactive menu
//! - [`service`] - Student, assignment and grade operations
//! - [`history`] - The operation log behind undo and redo
//! - [`store`] - In-memory and file-backed repositories
//! - [`core`] - Domain types, records and configuration
//! - [`ui`] - Output and prompts
//!
//! # Correctness Invariants
//!
//! 1. Every successful mutation records exactly one operation
//! 2. A failed mutation changes nothing and records nothing
//! 3. A failed undo or redo leaves both history stacks unchanged
//! 4. File-backed stores never diverge from their in-memory view

pub mod cli;
pub mod core;
pub mod history;
pub mod service;
pub mod store;
pub mod ui;
