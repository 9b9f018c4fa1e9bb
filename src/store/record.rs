//! store::record
//!
//! [`Record`] implementations for the domain model.
//!
//! # Text Format
//!
//! One record per line, fields separated by commas. The free-text field
//! always comes last so it may itself contain commas:
//!
//! ```text
//! student:     <id>,<group>,<name>
//! assignment:  <id>,<deadline YYYY-MM-DD>,<description>
//! grade:       <assignment id>,<student id>,<value or empty>
//! ```

use crate::core::model::{Assignment, Grade, GradeKey, Student};
use crate::core::types::{parse_date, AssignmentId, GradeValue, GroupId, StudentId};

use super::traits::Record;

/// Split `line` into exactly `N` fields; the last one keeps any commas.
fn fields<const N: usize>(line: &str) -> Result<[&str; N], String> {
    let parts: Vec<&str> = line.splitn(N, ',').map(str::trim).collect();
    parts
        .try_into()
        .map_err(|parts: Vec<&str>| format!("expected {} fields, found {}", N, parts.len()))
}

impl Record for Student {
    type Key = StudentId;
    const KIND: &'static str = "student";

    fn key(&self) -> StudentId {
        self.id
    }

    fn to_line(&self) -> String {
        format!("{},{},{}", self.id, self.group, self.name)
    }

    fn from_line(line: &str) -> Result<Self, String> {
        let [id, group, name] = fields::<3>(line)?;
        let id = id.parse::<StudentId>().map_err(|e| e.to_string())?;
        let group = group.parse::<GroupId>().map_err(|e| e.to_string())?;
        Student::new(id, name, group).map_err(|e| e.to_string())
    }
}

impl Record for Assignment {
    type Key = AssignmentId;
    const KIND: &'static str = "assignment";

    fn key(&self) -> AssignmentId {
        self.id
    }

    fn to_line(&self) -> String {
        format!("{},{},{}", self.id, self.deadline, self.description)
    }

    fn from_line(line: &str) -> Result<Self, String> {
        let [id, deadline, description] = fields::<3>(line)?;
        let id = id.parse::<AssignmentId>().map_err(|e| e.to_string())?;
        let deadline = parse_date(deadline).map_err(|e| e.to_string())?;
        Assignment::new(id, description, deadline).map_err(|e| e.to_string())
    }
}

impl Record for Grade {
    type Key = GradeKey;
    const KIND: &'static str = "grade";

    fn key(&self) -> GradeKey {
        Grade::key(self)
    }

    fn to_line(&self) -> String {
        let value = self.value.map(|v| v.to_string()).unwrap_or_default();
        format!("{},{},{}", self.assignment_id, self.student_id, value)
    }

    fn from_line(line: &str) -> Result<Self, String> {
        let [assignment_id, student_id, value] = fields::<3>(line)?;
        let value = match value {
            "" => None,
            raw => Some(raw.parse::<GradeValue>().map_err(|e| e.to_string())?),
        };
        Ok(Grade {
            assignment_id: assignment_id
                .parse::<AssignmentId>()
                .map_err(|e| e.to_string())?,
            student_id: student_id
                .parse::<StudentId>()
                .map_err(|e| e.to_string())?,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_name_may_contain_commas() {
        let student = Student::from_line("17,911,Doe, Jane").unwrap();
        assert_eq!(student.name, "Doe, Jane");
        assert_eq!(student.to_line(), "17,911,Doe, Jane");
    }

    #[test]
    fn student_line_needs_three_fields() {
        let err = Student::from_line("17,911").unwrap_err();
        assert_eq!(err, "expected 3 fields, found 2");
    }

    #[test]
    fn assignment_line_parses_deadline() {
        let assignment = Assignment::from_line("4,2024-12-15,Math homework").unwrap();
        assert_eq!(assignment.deadline.to_string(), "2024-12-15");
        assert!(Assignment::from_line("4,tomorrow,Math").is_err());
    }

    #[test]
    fn grade_empty_value_is_ungraded() {
        let grade = Grade::from_line("4,17,").unwrap();
        assert_eq!(grade.value, None);
        assert_eq!(grade.to_line(), "4,17,");

        let graded = Grade::from_line("4,17,9").unwrap();
        assert_eq!(graded.value.map(GradeValue::get), Some(9));
    }

    #[test]
    fn grade_out_of_range_rejected() {
        assert!(Grade::from_line("4,17,11").is_err());
    }
}
