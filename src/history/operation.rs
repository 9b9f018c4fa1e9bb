//! history::operation
//!
//! Undo/redo pairs recorded in the [`OperationLog`](super::OperationLog).
//!
//! # Types
//!
//! - [`Reversible`] - What the log stores: anything that can be undone and redone
//! - [`Operation`] - Exactly one undo action and one redo action
//! - [`CascadedOperation`] - Ordered undo/redo steps treated as one unit
//!
//! The log cannot check that an undo action really inverts its redo action.
//! That correctness belongs to whoever builds the operation.

use anyhow::Result;

use super::action::ReversibleAction;

/// A recorded change that can be reversed and re-applied.
pub trait Reversible {
    /// Restore the state from immediately before the change.
    fn undo(&self) -> Result<()>;

    /// Reproduce the state from immediately after the change.
    fn redo(&self) -> Result<()>;
}

/// A matched undo/redo pair for one logical mutation.
///
/// Build it right after performing the mutation, so both closures capture
/// the exact prior and new state.
#[derive(Debug)]
pub struct Operation {
    undo: ReversibleAction,
    redo: ReversibleAction,
}

impl Operation {
    /// Pair an undo action with its redo action.
    pub fn new(undo: ReversibleAction, redo: ReversibleAction) -> Self {
        Self { undo, redo }
    }

    /// Shorthand for building both actions from closures.
    pub fn from_fns(
        undo: impl Fn() -> Result<()> + 'static,
        redo: impl Fn() -> Result<()> + 'static,
    ) -> Self {
        Self::new(ReversibleAction::new(undo), ReversibleAction::new(redo))
    }
}

impl Reversible for Operation {
    fn undo(&self) -> Result<()> {
        self.undo.invoke()
    }

    fn redo(&self) -> Result<()> {
        self.redo.invoke()
    }
}

/// Several inverse steps that must be undone and redone together.
///
/// Undo runs the undo actions in reverse insertion order; redo runs the
/// redo actions in insertion order. Both stop at the first failing action.
///
/// # Example
///
/// ```
/// use gradebook::history::{CascadedOperation, Reversible, ReversibleAction};
///
/// let mut op = CascadedOperation::new();
/// op.step(ReversibleAction::noop(), ReversibleAction::noop());
/// op.step(ReversibleAction::noop(), ReversibleAction::noop());
/// assert_eq!(op.len(), 2);
/// op.undo().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CascadedOperation {
    undo: Vec<ReversibleAction>,
    redo: Vec<ReversibleAction>,
}

impl CascadedOperation {
    /// Create an empty cascade.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step: the action that reverses it and the one that re-applies it.
    pub fn step(&mut self, undo: ReversibleAction, redo: ReversibleAction) {
        self.undo.push(undo);
        self.redo.push(redo);
    }

    /// Append an undo action without a matching redo action.
    pub fn add_undo(&mut self, undo: ReversibleAction) {
        self.undo.push(undo);
    }

    /// Append a redo action without a matching undo action.
    pub fn add_redo(&mut self, redo: ReversibleAction) {
        self.redo.push(redo);
    }

    /// Number of steps (the longer of the two sequences).
    pub fn len(&self) -> usize {
        self.undo.len().max(self.redo.len())
    }

    /// True when no actions have been added.
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.redo.is_empty()
    }
}

impl Reversible for CascadedOperation {
    fn undo(&self) -> Result<()> {
        for action in self.undo.iter().rev() {
            action.invoke()?;
        }
        Ok(())
    }

    fn redo(&self) -> Result<()> {
        for action in &self.redo {
            action.invoke()?;
        }
        Ok(())
    }
}
