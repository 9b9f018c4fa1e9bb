//! service::sample
//!
//! Random records for trying the shell out on an empty store.
//!
//! Generated data is written straight to the repositories. It is not an
//! operation in the log, so it cannot be undone.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::core::model::{Assignment, Grade, Student};
use crate::core::types::{AssignmentId, GradeValue, GroupId, StudentId};
use crate::store::{Repositories, StoreError};

const ID_RANGE: RangeInclusive<u32> = 1000..=9999;
const GROUP_RANGE: RangeInclusive<u32> = 900..=999;

/// Deadlines fall within this many days either side of today.
const DEADLINE_SPREAD: u64 = 60;

/// Share of handed-out assignments that get a grade.
const GRADED_RATIO: f64 = 0.7;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Dennis", "Donald", "Edsger", "Frances", "Grace",
    "John", "Katherine", "Ken", "Leslie", "Linus", "Margaret", "Niklaus", "Radia", "Tony",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Dijkstra", "Hamilton", "Hoare", "Hopper", "Johnson", "Kay", "Knuth",
    "Lamport", "Liskov", "Lovelace", "McCarthy", "Perlman", "Ritchie", "Shannon", "Thompson",
    "Turing", "Wirth",
];

const TOPICS: &[&str] = &[
    "binary search trees",
    "graph traversal",
    "hash tables",
    "linked lists",
    "sorting algorithms",
    "dynamic programming",
    "recursion",
    "string parsing",
    "file input and output",
    "unit testing",
];

const TASKS: &[&str] = &["Implement", "Analyse", "Document", "Benchmark", "Refactor"];

/// Counts of generated records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleSummary {
    pub students: usize,
    pub assignments: usize,
    pub grades: usize,
}

/// Fill `repos` with `size` students and `size` assignments.
///
/// Every student receives a random subset of the assignments, and most of
/// those get a grade. Deadlines are spread around `today` so some entries
/// are overdue.
///
/// # Errors
///
/// Returns the first storage error, for example when a file store cannot
/// be written.
pub fn generate<G: Rng + ?Sized>(
    repos: &Repositories,
    rng: &mut G,
    size: usize,
    today: NaiveDate,
) -> Result<SampleSummary, StoreError> {
    let mut summary = SampleSummary::default();
    if size == 0 {
        return Ok(summary);
    }

    let assignment_ids = unique_ids(rng, size);
    let mut assignments = repos.assignments.borrow_mut();
    for raw in &assignment_ids {
        let assignment = Assignment {
            id: AssignmentId::new(*raw),
            description: description(rng),
            deadline: deadline(rng, today),
        };
        assignments.add(assignment)?;
        summary.assignments += 1;
    }
    drop(assignments);

    let mut students = repos.students.borrow_mut();
    let mut grades = repos.grades.borrow_mut();
    for raw in unique_ids(rng, size) {
        let student = Student {
            id: StudentId::new(raw),
            name: name(rng),
            group: GroupId::new(rng.random_range(GROUP_RANGE)),
        };
        let id = student.id;
        students.add(student)?;
        summary.students += 1;

        let count = rng.random_range(1..=assignment_ids.len().div_ceil(2));
        for raw in assignment_ids.choose_multiple(rng, count) {
            let value = if rng.random_bool(GRADED_RATIO) {
                GradeValue::new(rng.random_range(1..=10)).ok()
            } else {
                None
            };
            grades.add(Grade::pending(AssignmentId::new(*raw), id).with_value(value))?;
            summary.grades += 1;
        }
    }

    tracing::debug!(
        students = summary.students,
        assignments = summary.assignments,
        grades = summary.grades,
        "generated sample data"
    );
    Ok(summary)
}

/// `count` distinct ids, capped at the size of the id range.
fn unique_ids<G: Rng + ?Sized>(rng: &mut G, count: usize) -> Vec<u32> {
    let available = (ID_RANGE.end() - ID_RANGE.start() + 1) as usize;
    let count = count.min(available);
    let mut ids = BTreeSet::new();
    while ids.len() < count {
        ids.insert(rng.random_range(ID_RANGE));
    }
    ids.into_iter().collect()
}

fn name<G: Rng + ?Sized>(rng: &mut G) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
    format!("{first} {last}")
}

fn description<G: Rng + ?Sized>(rng: &mut G) -> String {
    let task = TASKS.choose(rng).copied().unwrap_or("Implement");
    let topic = TOPICS.choose(rng).copied().unwrap_or("recursion");
    format!("{task} {topic}")
}

fn deadline<G: Rng + ?Sized>(rng: &mut G, today: NaiveDate) -> NaiveDate {
    let offset = Days::new(rng.random_range(0..=DEADLINE_SPREAD));
    let shifted = if rng.random_bool(0.5) {
        today.checked_sub_days(offset)
    } else {
        today.checked_add_days(offset)
    };
    shifted.unwrap_or(today)
}
