//! service::grades
//!
//! Grading and the reports built on grade entries.
//!
//! # Reports
//!
//! - [`GradeService::ranking_for`] - students given an assignment, best first
//! - [`GradeService::late_students`] - students holding an ungraded,
//!   overdue assignment
//! - [`GradeService::best_students`] - students by average grade

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use chrono::NaiveDate;

use crate::core::model::{Assignment, Grade, GradeKey, Student};
use crate::core::types::{AssignmentId, GradeValue, StudentId};
use crate::history::{Operation, SharedLog};
use crate::store::{Repositories, Shared};

use super::update_action;
use super::ServiceError;

/// Grading operations and reports.
pub struct GradeService {
    grades: Shared<Grade>,
    students: Shared<Student>,
    assignments: Shared<Assignment>,
    history: SharedLog,
}

impl GradeService {
    pub fn new(repos: &Repositories, history: SharedLog) -> Self {
        Self {
            grades: Rc::clone(&repos.grades),
            students: Rc::clone(&repos.students),
            assignments: Rc::clone(&repos.assignments),
            history,
        }
    }

    /// Grade a student's assignment.
    ///
    /// The student must have been given the assignment and not yet be
    /// graded for it.
    ///
    /// # Errors
    ///
    /// - `ServiceError::StudentNotFound` / `AssignmentNotFound` for unknown ids
    /// - `ServiceError::NotAssigned` if the student lacks the assignment
    /// - `ServiceError::AlreadyGraded` if a grade is already set
    pub fn grade(
        &self,
        student: StudentId,
        assignment: AssignmentId,
        value: GradeValue,
    ) -> Result<Grade, ServiceError> {
        self.require_student(student)?;
        self.require_assignment(assignment)?;

        let key = GradeKey::new(assignment, student);
        let entry = self
            .grades
            .borrow()
            .find(key)
            .ok_or(ServiceError::NotAssigned {
                assignment,
                student,
            })?;
        if entry.is_graded() {
            return Err(ServiceError::AlreadyGraded {
                assignment,
                student,
            });
        }

        let graded = entry.with_value(Some(value));
        self.grades.borrow_mut().update(graded.clone())?;
        self.history.borrow_mut().record(Operation::new(
            update_action(&self.grades, entry),
            update_action(&self.grades, graded.clone()),
        ));
        tracing::debug!(%student, %assignment, grade = %value, "graded");
        Ok(graded)
    }

    /// Assignments the student holds that have no grade yet.
    ///
    /// # Errors
    ///
    /// `ServiceError::StudentNotFound` for an unknown student.
    pub fn ungraded_for(&self, student: StudentId) -> Result<Vec<Assignment>, ServiceError> {
        Ok(self
            .grades_for(student)?
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(assignment, _)| assignment)
            .collect())
    }

    /// Every assignment the student holds, with its grade if set.
    ///
    /// # Errors
    ///
    /// `ServiceError::StudentNotFound` for an unknown student.
    pub fn grades_for(
        &self,
        student: StudentId,
    ) -> Result<Vec<(Assignment, Option<GradeValue>)>, ServiceError> {
        self.require_student(student)?;
        let entries = self
            .grades
            .borrow()
            .filter(&|g: &Grade| g.student_id == student);
        let assignments = self.assignments.borrow();
        Ok(entries
            .into_iter()
            .filter_map(|g| assignments.find(g.assignment_id).map(|a| (a, g.value)))
            .collect())
    }

    /// Students given `assignment`, highest grade first.
    ///
    /// Ungraded students come last. Ties keep id order.
    ///
    /// # Errors
    ///
    /// `ServiceError::AssignmentNotFound` for an unknown assignment.
    pub fn ranking_for(
        &self,
        assignment: AssignmentId,
    ) -> Result<Vec<(Student, Option<GradeValue>)>, ServiceError> {
        self.require_assignment(assignment)?;
        let entries = self
            .grades
            .borrow()
            .filter(&|g: &Grade| g.assignment_id == assignment);
        let students = self.students.borrow();
        let mut ranking: Vec<(Student, Option<GradeValue>)> = entries
            .into_iter()
            .filter_map(|g| students.find(g.student_id).map(|s| (s, g.value)))
            .collect();

        // Option orders None below Some, so reversing puts ungraded last.
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        Ok(ranking)
    }

    /// Students with at least one ungraded assignment whose deadline is
    /// before `today`.
    pub fn late_students(&self, today: NaiveDate) -> Vec<Student> {
        let overdue: BTreeSet<AssignmentId> = self
            .assignments
            .borrow()
            .filter(&|a: &Assignment| a.is_overdue(today))
            .into_iter()
            .map(|a| a.id)
            .collect();

        let late: BTreeSet<StudentId> = self
            .grades
            .borrow()
            .filter(&|g: &Grade| !g.is_graded() && overdue.contains(&g.assignment_id))
            .into_iter()
            .map(|g| g.student_id)
            .collect();

        let students = self.students.borrow();
        late.into_iter().filter_map(|id| students.find(id)).collect()
    }

    /// Every student with their average over graded assignments, best
    /// first.
    ///
    /// A student without grades averages 0.0. Ties keep id order.
    pub fn best_students(&self) -> Vec<(Student, f64)> {
        let mut totals: BTreeMap<StudentId, (u32, u32)> = BTreeMap::new();
        for grade in self.grades.borrow().list() {
            if let Some(value) = grade.value {
                let entry = totals.entry(grade.student_id).or_insert((0, 0));
                entry.0 += u32::from(value.get());
                entry.1 += 1;
            }
        }

        let mut averages: Vec<(Student, f64)> = self
            .students
            .borrow()
            .list()
            .into_iter()
            .map(|s| {
                let average = match totals.get(&s.id) {
                    Some(&(sum, count)) if count > 0 => f64::from(sum) / f64::from(count),
                    _ => 0.0,
                };
                (s, average)
            })
            .collect();

        averages.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.id.cmp(&b.0.id),
            other => other,
        });
        averages
    }

    fn require_student(&self, id: StudentId) -> Result<(), ServiceError> {
        if self.students.borrow().contains(id) {
            Ok(())
        } else {
            Err(ServiceError::StudentNotFound(id))
        }
    }

    fn require_assignment(&self, id: AssignmentId) -> Result<(), ServiceError> {
        if self.assignments.borrow().contains(id) {
            Ok(())
        } else {
            Err(ServiceError::AssignmentNotFound(id))
        }
    }
}
