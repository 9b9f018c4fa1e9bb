//! service::students
//!
//! Student management. Removing a student also removes their grades, as
//! one undoable change.

use std::rc::Rc;

use crate::core::model::{Grade, Student};
use crate::core::types::{non_empty, GroupId, StudentId};
use crate::history::{CascadedOperation, Operation, SharedLog};
use crate::store::{Repositories, Shared};

use super::{add_action, add_all_action, remove_action, remove_all_action, update_action};
use super::ServiceError;

/// Student operations, recorded in the shared log.
pub struct StudentService {
    students: Shared<Student>,
    grades: Shared<Grade>,
    history: SharedLog,
}

impl StudentService {
    pub fn new(repos: &Repositories, history: SharedLog) -> Self {
        Self {
            students: Rc::clone(&repos.students),
            grades: Rc::clone(&repos.grades),
            history,
        }
    }

    /// Look up a student.
    ///
    /// # Errors
    ///
    /// `ServiceError::StudentNotFound` if there is no such student.
    pub fn get(&self, id: StudentId) -> Result<Student, ServiceError> {
        self.students
            .borrow()
            .find(id)
            .ok_or(ServiceError::StudentNotFound(id))
    }

    /// All students in id order.
    pub fn list(&self) -> Vec<Student> {
        self.students.borrow().list()
    }

    /// Ids of every student.
    pub fn ids(&self) -> Vec<StudentId> {
        self.list().into_iter().map(|s| s.id).collect()
    }

    /// Students whose name contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<Student> {
        let term = term.trim().to_lowercase();
        self.students
            .borrow()
            .filter(&|s: &Student| s.name.to_lowercase().contains(&term))
    }

    /// Add a new student.
    ///
    /// # Errors
    ///
    /// `ServiceError::DuplicateStudent` if the id is taken.
    pub fn add(&self, student: Student) -> Result<(), ServiceError> {
        if self.students.borrow().contains(student.id) {
            return Err(ServiceError::DuplicateStudent(student.id));
        }
        self.students.borrow_mut().add(student.clone())?;

        let id = student.id;
        self.history.borrow_mut().record(Operation::new(
            remove_action(&self.students, id),
            add_action(&self.students, student),
        ));
        tracing::debug!(student = %id, "added student");
        Ok(())
    }

    /// Remove a student and every grade entry they hold.
    ///
    /// Returns the removed student.
    ///
    /// # Errors
    ///
    /// `ServiceError::StudentNotFound` if there is no such student.
    pub fn remove(&self, id: StudentId) -> Result<Student, ServiceError> {
        let student = self.get(id)?;
        self.students.borrow_mut().remove(id)?;

        let removed = self
            .grades
            .borrow_mut()
            .remove_where(&|g: &Grade| g.student_id == id);
        let removed = match removed {
            Ok(removed) => removed,
            Err(e) => {
                // Put the student back so the failed call leaves no trace.
                self.students.borrow_mut().add(student)?;
                return Err(e.into());
            }
        };

        let grade_keys = removed.iter().map(Grade::key).collect();
        let mut operation = CascadedOperation::new();
        operation.step(
            add_action(&self.students, student.clone()),
            remove_action(&self.students, id),
        );
        operation.step(
            add_all_action(&self.grades, removed),
            remove_all_action(&self.grades, grade_keys),
        );
        self.history.borrow_mut().record(operation);

        tracing::debug!(student = %id, "removed student");
        Ok(student)
    }

    /// Change a student's name and/or group.
    ///
    /// Returns the updated student.
    ///
    /// # Errors
    ///
    /// - `ServiceError::EmptyUpdate` if neither value is given
    /// - `ServiceError::StudentNotFound` if there is no such student
    /// - `ServiceError::Invalid` if the new name is blank
    pub fn update(
        &self,
        id: StudentId,
        name: Option<&str>,
        group: Option<GroupId>,
    ) -> Result<Student, ServiceError> {
        if name.is_none() && group.is_none() {
            return Err(ServiceError::EmptyUpdate);
        }

        let old = self.get(id)?;
        let mut new = old.clone();
        if let Some(name) = name {
            new.name = non_empty("student name", name)?;
        }
        if let Some(group) = group {
            new.group = group;
        }

        self.students.borrow_mut().update(new.clone())?;
        self.history.borrow_mut().record(Operation::new(
            update_action(&self.students, old),
            update_action(&self.students, new.clone()),
        ));
        tracing::debug!(student = %id, "updated student");
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::core::types::{AssignmentId, GradeValue};
    use crate::history::HistoryError;

    #[test]
    fn add_undo_redo_restores_identical_student() {
        let book = gradebook();
        let ada = student(1234, "Ada Lovelace", 911);
        book.students.add(ada.clone()).unwrap();

        book.undo().unwrap();
        assert!(book.students.list().is_empty());

        book.redo().unwrap();
        assert_eq!(book.students.get(ada.id).unwrap(), ada);
    }

    #[test]
    fn duplicate_add_records_nothing() {
        let book = gradebook();
        book.students.add(student(1, "Ada", 911)).unwrap();

        let err = book.students.add(student(1, "Bob", 912)).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateStudent(_)));
        assert_eq!(book.history().borrow().undo_depth(), 1);
    }

    #[test]
    fn remove_takes_grades_and_undo_brings_them_back() {
        let book = gradebook();
        book.students.add(student(1, "Ada", 911)).unwrap();
        book.students.add(student(2, "Bob", 911)).unwrap();
        book.assignments
            .add(assignment(10, "Essay", "2030-01-01"))
            .unwrap();
        book.assignments
            .assign_to_group(AssignmentId::new(10), GroupId::new(911))
            .unwrap();
        book.grades
            .grade(
                StudentId::new(1),
                AssignmentId::new(10),
                GradeValue::new(9).unwrap(),
            )
            .unwrap();

        book.students.remove(StudentId::new(1)).unwrap();
        assert!(book.students.get(StudentId::new(1)).is_err());
        assert_eq!(book.repositories().grades.borrow().len(), 1);

        // One undo reverses the whole removal.
        book.undo().unwrap();
        let grades = book.grades.grades_for(StudentId::new(1)).unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].1.map(GradeValue::get), Some(9));

        book.redo().unwrap();
        assert!(book.students.get(StudentId::new(1)).is_err());
        assert_eq!(book.repositories().grades.borrow().len(), 1);
    }

    #[test]
    fn remove_missing_student_fails() {
        let book = gradebook();
        assert!(matches!(
            book.students.remove(StudentId::new(5)),
            Err(ServiceError::StudentNotFound(_))
        ));
        assert!(matches!(
            book.undo(),
            Err(HistoryError::EmptyHistory(_))
        ));
    }

    #[test]
    fn update_requires_a_change() {
        let book = gradebook();
        book.students.add(student(1, "Ada", 911)).unwrap();
        assert!(matches!(
            book.students.update(StudentId::new(1), None, None),
            Err(ServiceError::EmptyUpdate)
        ));
    }

    #[test]
    fn update_is_reversible() {
        let book = gradebook();
        book.students.add(student(1, "Ada", 911)).unwrap();
        book.students
            .update(StudentId::new(1), Some("Ada King"), Some(GroupId::new(912)))
            .unwrap();

        book.undo().unwrap();
        assert_eq!(book.students.get(StudentId::new(1)).unwrap(), student(1, "Ada", 911));

        book.redo().unwrap();
        assert_eq!(
            book.students.get(StudentId::new(1)).unwrap(),
            student(1, "Ada King", 912)
        );
    }

    #[test]
    fn update_rejects_blank_name() {
        let book = gradebook();
        book.students.add(student(1, "Ada", 911)).unwrap();
        assert!(matches!(
            book.students.update(StudentId::new(1), Some("  "), None),
            Err(ServiceError::Invalid(_))
        ));
    }

    #[test]
    fn search_ignores_case() {
        let book = gradebook();
        book.students.add(student(1, "Ada Lovelace", 911)).unwrap();
        book.students.add(student(2, "Grace Hopper", 911)).unwrap();

        let found = book.students.search("LOVE");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, StudentId::new(1));
        assert_eq!(book.students.ids().len(), 2);
    }

    #[test]
    fn failed_remove_puts_student_back() {
        let book = gradebook_with_grades(FailingRepository::failing_remove_where());
        book.students.add(student(1, "Ada", 911)).unwrap();
        book.assignments
            .add(assignment(10, "Essay", "2030-01-01"))
            .unwrap();
        book.assignments
            .assign_to_student(AssignmentId::new(10), StudentId::new(1))
            .unwrap();
        let depth = book.history().borrow().undo_depth();

        assert!(matches!(
            book.students.remove(StudentId::new(1)),
            Err(ServiceError::Store(_))
        ));

        assert_eq!(book.students.get(StudentId::new(1)).unwrap(), student(1, "Ada", 911));
        assert_eq!(book.grades.grades_for(StudentId::new(1)).unwrap().len(), 1);
        assert_eq!(book.history().borrow().undo_depth(), depth);
    }
}
