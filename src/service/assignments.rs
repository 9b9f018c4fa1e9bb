//! service::assignments
//!
//! Assignment management and handing assignments out to students.
//!
//! Giving an assignment to a student creates an ungraded [`Grade`] entry.
//! Giving one to a group creates an entry for every member that does not
//! already have it, recorded as a single undoable change.

use std::rc::Rc;

use chrono::NaiveDate;

use crate::core::model::{Assignment, Grade, GradeKey, Student};
use crate::core::types::{non_empty, AssignmentId, GroupId, StudentId};
use crate::history::{CascadedOperation, Operation, SharedLog};
use crate::store::{Repositories, Shared};

use super::{add_action, add_all_action, remove_action, remove_all_action, update_action};
use super::ServiceError;

/// Assignment operations, recorded in the shared log.
pub struct AssignmentService {
    assignments: Shared<Assignment>,
    students: Shared<Student>,
    grades: Shared<Grade>,
    history: SharedLog,
}

impl AssignmentService {
    pub fn new(repos: &Repositories, history: SharedLog) -> Self {
        Self {
            assignments: Rc::clone(&repos.assignments),
            students: Rc::clone(&repos.students),
            grades: Rc::clone(&repos.grades),
            history,
        }
    }

    /// Look up an assignment.
    ///
    /// # Errors
    ///
    /// `ServiceError::AssignmentNotFound` if there is no such assignment.
    pub fn get(&self, id: AssignmentId) -> Result<Assignment, ServiceError> {
        self.assignments
            .borrow()
            .find(id)
            .ok_or(ServiceError::AssignmentNotFound(id))
    }

    /// All assignments in id order.
    pub fn list(&self) -> Vec<Assignment> {
        self.assignments.borrow().list()
    }

    /// Add a new assignment.
    ///
    /// # Errors
    ///
    /// `ServiceError::DuplicateAssignment` if the id is taken.
    pub fn add(&self, assignment: Assignment) -> Result<(), ServiceError> {
        if self.assignments.borrow().contains(assignment.id) {
            return Err(ServiceError::DuplicateAssignment(assignment.id));
        }
        self.assignments.borrow_mut().add(assignment.clone())?;

        let id = assignment.id;
        self.history.borrow_mut().record(Operation::new(
            remove_action(&self.assignments, id),
            add_action(&self.assignments, assignment),
        ));
        tracing::debug!(assignment = %id, "added assignment");
        Ok(())
    }

    /// Remove an assignment and every grade entry for it.
    ///
    /// # Errors
    ///
    /// `ServiceError::AssignmentNotFound` if there is no such assignment.
    pub fn remove(&self, id: AssignmentId) -> Result<Assignment, ServiceError> {
        let assignment = self.get(id)?;
        self.assignments.borrow_mut().remove(id)?;

        let removed = self
            .grades
            .borrow_mut()
            .remove_where(&|g: &Grade| g.assignment_id == id);
        let removed = match removed {
            Ok(removed) => removed,
            Err(e) => {
                self.assignments.borrow_mut().add(assignment)?;
                return Err(e.into());
            }
        };

        let grade_keys = removed.iter().map(Grade::key).collect();
        let mut operation = CascadedOperation::new();
        operation.step(
            add_action(&self.assignments, assignment.clone()),
            remove_action(&self.assignments, id),
        );
        operation.step(
            add_all_action(&self.grades, removed),
            remove_all_action(&self.grades, grade_keys),
        );
        self.history.borrow_mut().record(operation);

        tracing::debug!(assignment = %id, "removed assignment");
        Ok(assignment)
    }

    /// Change an assignment's description and/or deadline.
    ///
    /// # Errors
    ///
    /// - `ServiceError::EmptyUpdate` if neither value is given
    /// - `ServiceError::AssignmentNotFound` if there is no such assignment
    /// - `ServiceError::Invalid` if the new description is blank
    pub fn update(
        &self,
        id: AssignmentId,
        description: Option<&str>,
        deadline: Option<NaiveDate>,
    ) -> Result<Assignment, ServiceError> {
        if description.is_none() && deadline.is_none() {
            return Err(ServiceError::EmptyUpdate);
        }

        let old = self.get(id)?;
        let mut new = old.clone();
        if let Some(description) = description {
            new.description = non_empty("assignment description", description)?;
        }
        if let Some(deadline) = deadline {
            new.deadline = deadline;
        }

        self.assignments.borrow_mut().update(new.clone())?;
        self.history.borrow_mut().record(Operation::new(
            update_action(&self.assignments, old),
            update_action(&self.assignments, new.clone()),
        ));
        tracing::debug!(assignment = %id, "updated assignment");
        Ok(new)
    }

    /// Give an assignment to one student.
    ///
    /// # Errors
    ///
    /// - `ServiceError::AssignmentNotFound` / `StudentNotFound` for unknown ids
    /// - `ServiceError::AlreadyAssigned` if the student already has it
    pub fn assign_to_student(
        &self,
        assignment: AssignmentId,
        student: StudentId,
    ) -> Result<(), ServiceError> {
        self.get(assignment)?;
        if !self.students.borrow().contains(student) {
            return Err(ServiceError::StudentNotFound(student));
        }
        let key = GradeKey::new(assignment, student);
        if self.grades.borrow().contains(key) {
            return Err(ServiceError::AlreadyAssigned {
                assignment,
                student,
            });
        }

        let entry = Grade::pending(assignment, student);
        self.grades.borrow_mut().add(entry.clone())?;
        self.history.borrow_mut().record(Operation::new(
            remove_action(&self.grades, key),
            add_action(&self.grades, entry),
        ));
        tracing::debug!(%assignment, %student, "gave assignment to student");
        Ok(())
    }

    /// Give an assignment to every student in `group` who lacks it.
    ///
    /// Returns the students that received it. One undo takes it back from
    /// all of them.
    ///
    /// # Errors
    ///
    /// - `ServiceError::AssignmentNotFound` for an unknown assignment
    /// - `ServiceError::EmptyGroup` if no student is in `group`
    /// - `ServiceError::GroupAlreadyAssigned` if every member already has it
    pub fn assign_to_group(
        &self,
        assignment: AssignmentId,
        group: GroupId,
    ) -> Result<Vec<StudentId>, ServiceError> {
        self.get(assignment)?;
        let members = self
            .students
            .borrow()
            .filter(&|s: &Student| s.group == group);
        if members.is_empty() {
            return Err(ServiceError::EmptyGroup(group));
        }

        let entries: Vec<Grade> = {
            let grades = self.grades.borrow();
            members
                .iter()
                .map(|s| Grade::pending(assignment, s.id))
                .filter(|entry| !grades.contains(entry.key()))
                .collect()
        };
        if entries.is_empty() {
            return Err(ServiceError::GroupAlreadyAssigned { assignment, group });
        }

        let mut added: Vec<GradeKey> = Vec::with_capacity(entries.len());
        for entry in &entries {
            let added_entry = self.grades.borrow_mut().add(entry.clone());
            if let Err(e) = added_entry {
                let mut grades = self.grades.borrow_mut();
                for key in &added {
                    // Already failing; the original error is the one to report.
                    let _ = grades.remove(*key);
                }
                return Err(e.into());
            }
            added.push(entry.key());
        }

        let mut operation = CascadedOperation::new();
        for entry in entries {
            operation.step(
                remove_action(&self.grades, entry.key()),
                add_action(&self.grades, entry),
            );
        }
        self.history.borrow_mut().record(operation);

        tracing::debug!(%assignment, %group, students = added.len(), "gave assignment to group");
        Ok(added.into_iter().map(|key| key.student_id).collect())
    }
}
