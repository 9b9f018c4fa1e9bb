//! history::action
//!
//! Deferred, argument-bound invocations.
//!
//! A [`ReversibleAction`] wraps a closure that has already captured
//! everything it needs. Invoking it takes no input and produces no value
//! beyond success or failure.

use std::fmt;

use anyhow::Result;

/// A zero-argument invocation bound to the state it captured at creation.
///
/// Actions may be invoked any number of times: once per undo and once per
/// subsequent redo. Each invocation must reproduce the same resulting state
/// whenever it is the active branch.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use gradebook::history::ReversibleAction;
///
/// let names = Rc::new(RefCell::new(Vec::new()));
/// let target = Rc::clone(&names);
/// let action = ReversibleAction::new(move || {
///     target.borrow_mut().push("Ada");
///     Ok(())
/// });
///
/// action.invoke().unwrap();
/// assert_eq!(*names.borrow(), vec!["Ada"]);
/// ```
pub struct ReversibleAction {
    call: Box<dyn Fn() -> Result<()>>,
}

impl ReversibleAction {
    /// Bind a closure as a reversible action.
    pub fn new(call: impl Fn() -> Result<()> + 'static) -> Self {
        Self {
            call: Box::new(call),
        }
    }

    /// An action that does nothing.
    pub fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    /// Apply the bound operation to its bound arguments.
    ///
    /// # Errors
    ///
    /// Propagates whatever error the bound operation returns, unchanged.
    pub fn invoke(&self) -> Result<()> {
        (self.call)()
    }
}

impl fmt::Debug for ReversibleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReversibleAction").finish_non_exhaustive()
    }
}
