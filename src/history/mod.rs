//! history
//!
//! Linear undo/redo ledger for reversible operations.
//!
//! # Overview
//!
//! The [`OperationLog`] keeps two stacks. Every mutation performed by a
//! caller is recorded as a [`Reversible`] value pushed onto the undo stack.
//! `undo` moves the newest entry to the redo stack after reversing it;
//! `redo` moves it back after re-applying it.
//!
//! # Linear History
//!
//! Recording a new operation clears the redo stack. Once the user makes a
//! fresh change after undoing, the undone branch is gone for good. There is
//! exactly one timeline.
//!
//! # Failure
//!
//! If a bound action fails, the error is returned and the operation stays
//! where it was. The log never rolls back a partially applied action.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use gradebook::history::{Operation, OperationLog};
//!
//! let value = Rc::new(Cell::new(1));
//! let mut log = OperationLog::new();
//!
//! value.set(2);
//! let (before, after) = (Rc::clone(&value), Rc::clone(&value));
//! log.record(Operation::from_fns(
//!     move || { before.set(1); Ok(()) },
//!     move || { after.set(2); Ok(()) },
//! ));
//!
//! log.undo().unwrap();
//! assert_eq!(value.get(), 1);
//! log.redo().unwrap();
//! assert_eq!(value.get(), 2);
//! assert!(log.redo().is_err());
//! ```

pub mod action;
pub mod operation;

pub use action::ReversibleAction;
pub use operation::{CascadedOperation, Operation, Reversible};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::Rc;

use thiserror::Error;

/// Operation log shared by every service in one session.
pub type SharedLog = Rc<RefCell<OperationLog>>;

/// Which way through history a call was moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Undo => write!(f, "undo"),
            Direction::Redo => write!(f, "redo"),
        }
    }
}

/// Errors from undo/redo.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The relevant stack is empty.
    #[error("nothing to {0}")]
    EmptyHistory(Direction),

    /// The stored action itself failed; the stacks are unchanged.
    ///
    /// Carries the action's own error untouched.
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

/// Two-stack undo/redo ledger.
///
/// Both stacks are most-recent-last. An operation lives on exactly one
/// stack at a time and is moved, never copied.
pub struct OperationLog {
    undo_stack: VecDeque<Box<dyn Reversible>>,
    redo_stack: Vec<Box<dyn Reversible>>,
    limit: Option<NonZeroUsize>,
}

impl OperationLog {
    /// Create an empty, unbounded log.
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty log that keeps at most `limit` undoable operations.
    ///
    /// When a record would exceed the limit, the oldest entry is dropped.
    pub fn with_limit(limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Wrap a fresh log for sharing between services.
    pub fn shared(limit: Option<NonZeroUsize>) -> SharedLog {
        let log = match limit {
            Some(limit) => Self::with_limit(limit),
            None => Self::new(),
        };
        Rc::new(RefCell::new(log))
    }

    /// Record an operation the caller has just performed.
    ///
    /// Discards every pending redo, then pushes `operation` onto the undo
    /// stack. Never fails.
    pub fn record(&mut self, operation: impl Reversible + 'static) {
        let discarded = self.redo_stack.len();
        self.redo_stack.clear();
        self.undo_stack.push_back(Box::new(operation));

        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit.get() {
                self.undo_stack.pop_front();
                tracing::debug!(limit = limit.get(), "evicted oldest undo entry");
            }
        }

        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            discarded_redos = discarded,
            "recorded operation"
        );
    }

    /// Reverse the most recently recorded (or redone) operation.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::EmptyHistory`] if there is nothing to undo
    /// - [`HistoryError::Action`] with the undo action's own error; the
    ///   operation stays on the undo stack
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let operation = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::EmptyHistory(Direction::Undo))?;

        if let Err(source) = operation.undo() {
            self.undo_stack.push_back(operation);
            tracing::warn!(error = %source, "undo action failed");
            return Err(HistoryError::Action(source));
        }

        self.redo_stack.push(operation);
        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "undo applied"
        );
        Ok(())
    }

    /// Re-apply the most recently undone operation.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::EmptyHistory`] if there is nothing to redo
    /// - [`HistoryError::Action`] with the redo action's own error; the
    ///   operation stays on the redo stack
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let operation = self
            .redo_stack
            .pop()
            .ok_or(HistoryError::EmptyHistory(Direction::Redo))?;

        if let Err(source) = operation.redo() {
            self.redo_stack.push(operation);
            tracing::warn!(error = %source, "redo action failed");
            return Err(HistoryError::Action(source));
        }

        // A redo never grows history past what was recorded, so no eviction.
        self.undo_stack.push_back(operation);
        tracing::debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "redo applied"
        );
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of operations that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The configured undo depth cap, if any.
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Forget all history without invoking anything.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationLog")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("limit", &self.limit)
            .finish()
    }
}
