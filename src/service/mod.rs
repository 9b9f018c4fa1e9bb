//! service
//!
//! Domain services: every mutation goes through here and is recorded in
//! the session's [`OperationLog`](crate::history::OperationLog).
//!
//! # Recording Contract
//!
//! Each mutating call:
//! 1. Validates its inputs against the repositories
//! 2. Performs the mutation
//! 3. Builds closures that reverse and re-apply it, capturing the exact
//!    prior and new records
//! 4. Records them as a single operation
//!
//! A call that fails records nothing. Changes spanning several records
//! (removing a student together with their grades) are one
//! [`CascadedOperation`](crate::history::CascadedOperation), so a single
//! undo reverses all of it.
//!
//! # Modules
//!
//! - [`students`] - Student CRUD
//! - [`assignments`] - Assignment CRUD and handing assignments out
//! - [`grades`] - Grading and reports
//! - [`sample`] - Generated data for trying the shell out

pub mod assignments;
pub mod grades;
pub mod sample;
pub mod students;

pub use assignments::AssignmentService;
pub use grades::GradeService;
pub use students::StudentService;

use std::rc::Rc;

use thiserror::Error;

use crate::core::types::{AssignmentId, GroupId, StudentId, TypeError};
use crate::history::{HistoryError, ReversibleAction, SharedLog};
use crate::store::{Record, Repositories, Shared, StoreError};

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),

    #[error("student {0} already exists")]
    DuplicateStudent(StudentId),

    #[error("assignment {0} not found")]
    AssignmentNotFound(AssignmentId),

    #[error("assignment {0} already exists")]
    DuplicateAssignment(AssignmentId),

    #[error("nothing to update: give at least one new value")]
    EmptyUpdate,

    #[error("student {student} already has assignment {assignment}")]
    AlreadyAssigned {
        assignment: AssignmentId,
        student: StudentId,
    },

    #[error("every student in group {group} already has assignment {assignment}")]
    GroupAlreadyAssigned {
        assignment: AssignmentId,
        group: GroupId,
    },

    #[error("no students in group {0}")]
    EmptyGroup(GroupId),

    #[error("student {student} was not given assignment {assignment}")]
    NotAssigned {
        assignment: AssignmentId,
        student: StudentId,
    },

    #[error("student {student} is already graded for assignment {assignment}")]
    AlreadyGraded {
        assignment: AssignmentId,
        student: StudentId,
    },

    #[error(transparent)]
    Invalid(#[from] TypeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// All services of one session, wired to the same repositories and log.
pub struct Gradebook {
    pub students: StudentService,
    pub assignments: AssignmentService,
    pub grades: GradeService,
    repos: Repositories,
    history: SharedLog,
}

impl Gradebook {
    /// Wire services over `repos`, all recording into `history`.
    pub fn new(repos: Repositories, history: SharedLog) -> Self {
        Self {
            students: StudentService::new(&repos, Rc::clone(&history)),
            assignments: AssignmentService::new(&repos, Rc::clone(&history)),
            grades: GradeService::new(&repos, Rc::clone(&history)),
            repos,
            history,
        }
    }

    /// Reverse the most recent change.
    ///
    /// # Errors
    ///
    /// `HistoryError::EmptyHistory` when there is nothing to undo.
    pub fn undo(&self) -> Result<(), HistoryError> {
        self.history.borrow_mut().undo()
    }

    /// Re-apply the most recently undone change.
    ///
    /// # Errors
    ///
    /// `HistoryError::EmptyHistory` when there is nothing to redo.
    pub fn redo(&self) -> Result<(), HistoryError> {
        self.history.borrow_mut().redo()
    }

    pub fn history(&self) -> &SharedLog {
        &self.history
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }
}

// =============================================================================
// Action builders shared by the services
// =============================================================================

/// Action that inserts `record`.
fn add_action<R: Record>(repo: &Shared<R>, record: R) -> ReversibleAction {
    let repo = Rc::clone(repo);
    ReversibleAction::new(move || {
        repo.borrow_mut().add(record.clone())?;
        Ok(())
    })
}

/// Action that inserts every record in `records`.
fn add_all_action<R: Record>(repo: &Shared<R>, records: Vec<R>) -> ReversibleAction {
    let repo = Rc::clone(repo);
    ReversibleAction::new(move || {
        let mut repo = repo.borrow_mut();
        for record in &records {
            repo.add(record.clone())?;
        }
        Ok(())
    })
}

/// Action that removes the record with `key`.
fn remove_action<R: Record>(repo: &Shared<R>, key: R::Key) -> ReversibleAction {
    let repo = Rc::clone(repo);
    ReversibleAction::new(move || {
        repo.borrow_mut().remove(key)?;
        Ok(())
    })
}

/// Action that removes every record whose key is in `keys`.
fn remove_all_action<R: Record>(repo: &Shared<R>, keys: Vec<R::Key>) -> ReversibleAction {
    let repo = Rc::clone(repo);
    ReversibleAction::new(move || {
        repo.borrow_mut()
            .remove_where(&|record: &R| keys.contains(&record.key()))?;
        Ok(())
    })
}

/// Action that overwrites the stored record with `record`.
fn update_action<R: Record>(repo: &Shared<R>, record: R) -> ReversibleAction {
    let repo = Rc::clone(repo);
    ReversibleAction::new(move || {
        repo.borrow_mut().update(record.clone())?;
        Ok(())
    })
}
