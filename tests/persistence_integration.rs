//! Integration tests for the persistence layer.
//!
//! These tests run the services against text and JSON file stores created
//! with tempfile, and check that undo and redo reach the disk.

use std::path::Path;

use tempfile::TempDir;

use gradebook::core::config::{StorageConfig, StorageKind};
use gradebook::core::model::{Assignment, Student};
use gradebook::core::types::{parse_date, AssignmentId, GradeValue, GroupId, StudentId};
use gradebook::history::OperationLog;
use gradebook::service::Gradebook;
use gradebook::store::Repositories;

// =============================================================================
// Test Helpers
// =============================================================================

/// A data directory with one store kind.
struct TestStore {
    dir: TempDir,
    kind: StorageKind,
}

impl TestStore {
    fn new(kind: StorageKind) -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            kind,
        }
    }

    fn config(&self) -> StorageConfig {
        StorageConfig {
            kind: self.kind,
            directory: Some(self.dir.path().to_path_buf()),
            ..Default::default()
        }
    }

    /// Open a fresh session over the files, as a new process would.
    fn open(&self) -> Gradebook {
        let repos = Repositories::open(&self.config()).expect("open repositories");
        Gradebook::new(repos, OperationLog::shared(None))
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn student(id: u32, name: &str, group: u32) -> Student {
    Student::new(StudentId::new(id), name, GroupId::new(group)).unwrap()
}

fn assignment(id: u32, description: &str, deadline: &str) -> Assignment {
    Assignment::new(AssignmentId::new(id), description, parse_date(deadline).unwrap()).unwrap()
}

// =============================================================================
// Text files
// =============================================================================

#[test]
fn text_store_writes_documented_line_formats() {
    let store = TestStore::new(StorageKind::Text);
    let book = store.open();

    book.students.add(student(1234, "Ada Lovelace", 911)).unwrap();
    book.assignments
        .add(assignment(7, "Write an essay", "2030-05-01"))
        .unwrap();
    book.assignments
        .assign_to_student(AssignmentId::new(7), StudentId::new(1234))
        .unwrap();

    assert_eq!(store.read("students.txt"), "1234,911,Ada Lovelace\n");
    assert_eq!(store.read("assignments.txt"), "7,2030-05-01,Write an essay\n");
    assert_eq!(store.read("grades.txt"), "7,1234,\n");

    book.grades
        .grade(StudentId::new(1234), AssignmentId::new(7), GradeValue::new(9).unwrap())
        .unwrap();
    assert_eq!(store.read("grades.txt"), "7,1234,9\n");
}

#[test]
fn undo_and_redo_reach_the_disk() {
    let store = TestStore::new(StorageKind::Text);
    let book = store.open();

    book.students.add(student(1, "Ada", 911)).unwrap();
    book.students.add(student(2, "Bob", 912)).unwrap();
    book.undo().unwrap();
    assert_eq!(store.read("students.txt"), "1,911,Ada\n");

    book.redo().unwrap();
    assert_eq!(store.read("students.txt"), "1,911,Ada\n2,912,Bob\n");
}

#[test]
fn cascaded_remove_restored_on_disk() {
    let store = TestStore::new(StorageKind::Text);
    let book = store.open();

    book.students.add(student(1, "Ada", 911)).unwrap();
    book.students.add(student(2, "Bob", 911)).unwrap();
    book.assignments.add(assignment(7, "Essay", "2030-05-01")).unwrap();
    book.assignments
        .assign_to_group(AssignmentId::new(7), GroupId::new(911))
        .unwrap();

    book.assignments.remove(AssignmentId::new(7)).unwrap();
    assert_eq!(store.read("grades.txt"), "");
    assert_eq!(store.read("assignments.txt"), "");

    book.undo().unwrap();
    assert_eq!(store.read("grades.txt"), "7,1,\n7,2,\n");
    assert_eq!(store.read("assignments.txt"), "7,2030-05-01,Essay\n");
}

#[test]
fn data_survives_reopen_but_history_does_not() {
    let store = TestStore::new(StorageKind::Text);
    {
        let book = store.open();
        book.students.add(student(1, "Ada", 911)).unwrap();
    }

    let book = store.open();
    assert_eq!(book.students.list(), vec![student(1, "Ada", 911)]);
    assert!(book.undo().is_err());
}

#[test]
fn malformed_file_fails_to_open() {
    let store = TestStore::new(StorageKind::Text);
    std::fs::write(store.path().join("students.txt"), "1,911,Ada\nbroken\n").unwrap();

    let err = Repositories::open(&store.config()).err().expect("open should fail");
    assert!(err.to_string().contains("line 2"));
}

// =============================================================================
// JSON files
// =============================================================================

#[test]
fn json_store_round_trips_grades() {
    let store = TestStore::new(StorageKind::Json);
    {
        let book = store.open();
        book.students.add(student(1, "Ada", 911)).unwrap();
        book.assignments.add(assignment(7, "Essay", "2030-05-01")).unwrap();
        book.assignments
            .assign_to_student(AssignmentId::new(7), StudentId::new(1))
            .unwrap();
        book.grades
            .grade(StudentId::new(1), AssignmentId::new(7), GradeValue::new(10).unwrap())
            .unwrap();
    }

    let grades: serde_json::Value = serde_json::from_str(&store.read("grades.json")).unwrap();
    assert_eq!(grades[0]["value"], 10);

    let book = store.open();
    let held = book.grades.grades_for(StudentId::new(1)).unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].1, Some(GradeValue::new(10).unwrap()));
}

#[test]
fn json_ungraded_entry_is_null() {
    let store = TestStore::new(StorageKind::Json);
    let book = store.open();
    book.students.add(student(1, "Ada", 911)).unwrap();
    book.assignments.add(assignment(7, "Essay", "2030-05-01")).unwrap();
    book.assignments
        .assign_to_student(AssignmentId::new(7), StudentId::new(1))
        .unwrap();

    let grades: serde_json::Value = serde_json::from_str(&store.read("grades.json")).unwrap();
    assert!(grades[0]["value"].is_null());
    assert_eq!(grades[0]["student_id"], 1);
}

#[test]
fn memory_store_writes_nothing() {
    let store = TestStore::new(StorageKind::Memory);
    let book = store.open();
    book.students.add(student(1, "Ada", 911)).unwrap();

    let entries = std::fs::read_dir(store.path()).unwrap().count();
    assert_eq!(entries, 0);
}
