//! core::model
//!
//! Domain records: students, assignments, and grade entries.
//!
//! Records are plain values. Constructors validate their text fields;
//! relationships between records (does this student exist?) are checked by
//! the services, not here.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{non_empty, AssignmentId, GradeValue, GroupId, StudentId, TypeError};

/// A student enrolled in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub group: GroupId,
}

impl Student {
    /// Create a student. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::Empty` if the name is blank.
    pub fn new(id: StudentId, name: &str, group: GroupId) -> Result<Self, TypeError> {
        Ok(Self {
            id,
            name: non_empty("student name", name)?,
            group,
        })
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - group {}", self.id, self.name, self.group)
    }
}

/// A piece of work with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub description: String,
    pub deadline: NaiveDate,
}

impl Assignment {
    /// Create an assignment. The description is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::Empty` if the description is blank.
    pub fn new(
        id: AssignmentId,
        description: &str,
        deadline: NaiveDate,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            id,
            description: non_empty("assignment description", description)?,
            deadline,
        })
    }

    /// True if the deadline fell before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline < today
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - due {}", self.id, self.description, self.deadline)
    }
}

/// Identifies one grade entry: which assignment, which student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradeKey {
    pub assignment_id: AssignmentId,
    pub student_id: StudentId,
}

impl GradeKey {
    pub fn new(assignment_id: AssignmentId, student_id: StudentId) -> Self {
        Self {
            assignment_id,
            student_id,
        }
    }
}

impl fmt::Display for GradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(assignment {}, student {})",
            self.assignment_id, self.student_id
        )
    }
}

/// An assignment given to a student, graded or not.
///
/// `value == None` means the student holds the assignment but it has not
/// been graded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub assignment_id: AssignmentId,
    pub student_id: StudentId,
    pub value: Option<GradeValue>,
}

impl Grade {
    /// An ungraded entry.
    pub fn pending(assignment_id: AssignmentId, student_id: StudentId) -> Self {
        Self {
            assignment_id,
            student_id,
            value: None,
        }
    }

    /// The same entry with `value` set.
    pub fn with_value(&self, value: Option<GradeValue>) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn key(&self) -> GradeKey {
        GradeKey::new(self.assignment_id, self.student_id)
    }

    pub fn is_graded(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} - {} - {}", self.assignment_id, self.student_id, value),
            None => write!(f, "{} - {} - ungraded", self.assignment_id, self.student_id),
        }
    }
}
