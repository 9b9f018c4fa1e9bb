//! cli::shell
//!
//! The interactive menu.
//!
//! # Design
//!
//! [`Shell`] reads answers from any `BufRead` and writes to an
//! [`Output`], so a whole session can be scripted in tests. Each menu
//! action maps to one service call. Failures from services and from
//! undo/redo are printed as `error: <message>` and the menu is shown
//! again; only I/O failures end the session early. End of input ends the
//! session cleanly.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::model::{Assignment, Student};
use crate::core::types::{non_empty, parse_date, AssignmentId, GradeValue, GroupId, StudentId};
use crate::history::HistoryError;
use crate::service::{Gradebook, ServiceError};
use crate::ui::output::Output;
use crate::ui::prompts::{PromptError, Prompter};

/// Why a menu action did not complete.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> Self {
        ShellError::Prompt(PromptError::IoError(e))
    }
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Students,
    Assignments,
    Give,
    Grade,
    ShowGrades,
    Ranking,
    Late,
    Best,
    Undo,
    Redo,
    Exit,
}

impl MenuItem {
    /// Menu entries in display order.
    pub const ALL: [MenuItem; 11] = [
        MenuItem::Students,
        MenuItem::Assignments,
        MenuItem::Give,
        MenuItem::Grade,
        MenuItem::ShowGrades,
        MenuItem::Ranking,
        MenuItem::Late,
        MenuItem::Best,
        MenuItem::Undo,
        MenuItem::Redo,
        MenuItem::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuItem::Students => 1,
            MenuItem::Assignments => 2,
            MenuItem::Give => 3,
            MenuItem::Grade => 4,
            MenuItem::ShowGrades => 5,
            MenuItem::Ranking => 6,
            MenuItem::Late => 7,
            MenuItem::Best => 8,
            MenuItem::Undo => 9,
            MenuItem::Redo => 10,
            MenuItem::Exit => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Students => "Manage students",
            MenuItem::Assignments => "Manage assignments",
            MenuItem::Give => "Give assignments",
            MenuItem::Grade => "Grade a student",
            MenuItem::ShowGrades => "Show a student's grades",
            MenuItem::Ranking => "Ranking for an assignment",
            MenuItem::Late => "Late students",
            MenuItem::Best => "Best students",
            MenuItem::Undo => "Undo",
            MenuItem::Redo => "Redo",
            MenuItem::Exit => "Exit",
        }
    }
}

impl FromStr for MenuItem {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MenuItem::ALL
            .into_iter()
            .find(|item| s.parse::<u8>().ok() == Some(item.number()))
            .ok_or_else(|| ShellError::UnknownOption(s.to_string()))
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

const STUDENT_MENU: &[&str] = &[
    "1. Add",
    "2. Remove",
    "3. Update",
    "4. List",
    "5. Search",
    "0. Back",
];
const ASSIGNMENT_MENU: &[&str] = &["1. Add", "2. Remove", "3. Update", "4. List", "0. Back"];
const GIVE_MENU: &[&str] = &["1. To a student", "2. To a group", "0. Back"];

/// A menu session over one [`Gradebook`].
pub struct Shell<R: BufRead, W: Write> {
    book: Gradebook,
    prompter: Prompter<R>,
    out: Output<W>,
    today: NaiveDate,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a session. `today` decides which assignments are overdue.
    pub fn new(book: Gradebook, input: R, out: Output<W>, today: NaiveDate) -> Self {
        Self {
            book,
            prompter: Prompter::new(input),
            out,
            today,
        }
    }

    /// Run the menu until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.show_menu()?;
            let answer = match self.prompter.text(&mut self.out, "Choose an option") {
                Ok(answer) => answer,
                Err(PromptError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            if answer.is_empty() {
                continue;
            }

            let outcome = answer.parse::<MenuItem>().and_then(|item| {
                if item == MenuItem::Exit {
                    Ok(false)
                } else {
                    self.dispatch(item).map(|()| true)
                }
            });
            match outcome {
                Ok(true) => {}
                Ok(false) => break,
                Err(ShellError::Prompt(PromptError::Eof)) => break,
                Err(ShellError::Prompt(e)) => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(error = %e, "menu action failed");
                    self.out.error(e)?;
                }
            }
        }
        self.out.flush()?;
        tracing::debug!("shell session ended");
        Ok(())
    }

    /// Consume the shell, returning its output.
    pub fn into_output(self) -> Output<W> {
        self.out
    }

    pub fn gradebook(&self) -> &Gradebook {
        &self.book
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.out.print("")?;
        for item in MenuItem::ALL {
            self.out.print(item)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, item: MenuItem) -> Result<(), ShellError> {
        match item {
            MenuItem::Students => self.students_menu(),
            MenuItem::Assignments => self.assignments_menu(),
            MenuItem::Give => self.give_menu(),
            MenuItem::Grade => self.grade(),
            MenuItem::ShowGrades => self.show_grades(),
            MenuItem::Ranking => self.ranking(),
            MenuItem::Late => self.late(),
            MenuItem::Best => self.best(),
            MenuItem::Undo => {
                self.book.undo()?;
                self.out.success("Undone.")?;
                Ok(())
            }
            MenuItem::Redo => {
                self.book.redo()?;
                self.out.success("Redone.")?;
                Ok(())
            }
            MenuItem::Exit => Ok(()),
        }
    }

    // =========================================================================
    // Prompt helpers
    // =========================================================================

    fn ask<T>(&mut self, message: &str) -> Result<T, ShellError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.prompter.parse(&mut self.out, message)?)
    }

    fn ask_optional<T>(&mut self, message: &str) -> Result<Option<T>, ShellError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.prompter.optional(&mut self.out, message)?)
    }

    fn submenu(&mut self, entries: &[&str]) -> Result<String, ShellError> {
        for entry in entries {
            self.out.print(entry)?;
        }
        Ok(self.prompter.text(&mut self.out, "Choose an option")?)
    }

    // =========================================================================
    // Students
    // =========================================================================

    fn students_menu(&mut self) -> Result<(), ShellError> {
        match self.submenu(STUDENT_MENU)?.as_str() {
            "1" => {
                let id: StudentId = self.ask("Student id")?;
                let name = self
                    .prompter
                    .parse_with(&mut self.out, "Name", |s| non_empty("student name", s))?;
                let group: GroupId = self.ask("Group")?;
                let student = Student::new(id, &name, group).map_err(ServiceError::from)?;
                self.book.students.add(student.clone())?;
                self.out.success(format_args!("Added student {}", student))?;
            }
            "2" => {
                let id: StudentId = self.ask("Student id")?;
                let removed = self.book.students.remove(id)?;
                self.out.success(format_args!("Removed student {}", removed))?;
            }
            "3" => {
                let id: StudentId = self.ask("Student id")?;
                self.book.students.get(id)?;
                let name: Option<String> = self.ask_optional("New name (blank to keep)")?;
                let group: Option<GroupId> = self.ask_optional("New group (blank to keep)")?;
                let updated = self.book.students.update(id, name.as_deref(), group)?;
                self.out.success(format_args!("Updated student {}", updated))?;
            }
            "4" => {
                let students = self.book.students.list();
                self.show_list(&students, "No students.")?;
            }
            "5" => {
                let term = self.prompter.text(&mut self.out, "Search for")?;
                let found = self.book.students.search(&term);
                self.show_list(&found, "No matching students.")?;
            }
            "0" | "" => {}
            other => return Err(ShellError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    fn assignments_menu(&mut self) -> Result<(), ShellError> {
        match self.submenu(ASSIGNMENT_MENU)?.as_str() {
            "1" => {
                let id: AssignmentId = self.ask("Assignment id")?;
                let description = self.prompter.parse_with(&mut self.out, "Description", |s| {
                    non_empty("assignment description", s)
                })?;
                let deadline = self.prompter.parse_with(
                    &mut self.out,
                    "Deadline (YYYY-MM-DD)",
                    parse_date,
                )?;
                let assignment =
                    Assignment::new(id, &description, deadline).map_err(ServiceError::from)?;
                self.book.assignments.add(assignment.clone())?;
                self.out.success(format_args!("Added assignment {}", assignment))?;
            }
            "2" => {
                let id: AssignmentId = self.ask("Assignment id")?;
                let removed = self.book.assignments.remove(id)?;
                self.out.success(format_args!("Removed assignment {}", removed))?;
            }
            "3" => {
                let id: AssignmentId = self.ask("Assignment id")?;
                self.book.assignments.get(id)?;
                let description: Option<String> =
                    self.ask_optional("New description (blank to keep)")?;
                let deadline = self.prompter.parse_with(
                    &mut self.out,
                    "New deadline (YYYY-MM-DD, blank to keep)",
                    |s| {
                        if s.is_empty() {
                            Ok(None)
                        } else {
                            parse_date(s).map(Some)
                        }
                    },
                )?;
                let updated = self
                    .book
                    .assignments
                    .update(id, description.as_deref(), deadline)?;
                self.out.success(format_args!("Updated assignment {}", updated))?;
            }
            "4" => {
                let assignments = self.book.assignments.list();
                self.show_list(&assignments, "No assignments.")?;
            }
            "0" | "" => {}
            other => return Err(ShellError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    fn give_menu(&mut self) -> Result<(), ShellError> {
        match self.submenu(GIVE_MENU)?.as_str() {
            "1" => {
                let assignment: AssignmentId = self.ask("Assignment id")?;
                let student: StudentId = self.ask("Student id")?;
                self.book.assignments.assign_to_student(assignment, student)?;
                self.out.success(format_args!(
                    "Gave assignment {} to student {}",
                    assignment, student
                ))?;
            }
            "2" => {
                let assignment: AssignmentId = self.ask("Assignment id")?;
                let group: GroupId = self.ask("Group")?;
                let given = self.book.assignments.assign_to_group(assignment, group)?;
                self.out.success(format_args!(
                    "Gave assignment {} to {} student(s) in group {}",
                    assignment,
                    given.len(),
                    group
                ))?;
            }
            "0" | "" => {}
            other => return Err(ShellError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    // =========================================================================
    // Grades and reports
    // =========================================================================

    fn grade(&mut self) -> Result<(), ShellError> {
        let student: StudentId = self.ask("Student id")?;
        let ungraded = self.book.grades.ungraded_for(student)?;
        if ungraded.is_empty() {
            self.out
                .line(format_args!("Student {} has nothing to grade.", student))?;
            return Ok(());
        }
        self.out.print("Ungraded assignments:")?;
        for assignment in &ungraded {
            self.out.print(format_args!("  {}", assignment))?;
        }

        let assignment: AssignmentId = self.ask("Assignment id")?;
        let value: GradeValue = self.ask("Grade (1-10)")?;
        let graded = self.book.grades.grade(student, assignment, value)?;
        self.out.success(format_args!("Graded: {}", graded))?;
        Ok(())
    }

    fn show_grades(&mut self) -> Result<(), ShellError> {
        let student: StudentId = self.ask("Student id")?;
        let grades = self.book.grades.grades_for(student)?;
        if grades.is_empty() {
            self.out
                .line(format_args!("Student {} has no assignments.", student))?;
        }
        for (assignment, value) in grades {
            self.out
                .line(format_args!("{} | {}", assignment, describe(value)))?;
        }
        Ok(())
    }

    fn ranking(&mut self) -> Result<(), ShellError> {
        let assignment: AssignmentId = self.ask("Assignment id")?;
        let ranking = self.book.grades.ranking_for(assignment)?;
        if ranking.is_empty() {
            self.out.line(format_args!(
                "Assignment {} was not given to anyone.",
                assignment
            ))?;
        }
        for (place, (student, value)) in ranking.iter().enumerate() {
            self.out.line(format_args!(
                "{}. {} | {}",
                place + 1,
                student,
                describe(*value)
            ))?;
        }
        Ok(())
    }

    fn late(&mut self) -> Result<(), ShellError> {
        let late = self.book.grades.late_students(self.today);
        self.show_list(&late, "No late students.")?;
        Ok(())
    }

    fn best(&mut self) -> Result<(), ShellError> {
        let best = self.book.grades.best_students();
        if best.is_empty() {
            self.out.line("No students.")?;
        }
        for (student, average) in best {
            self.out
                .line(format_args!("{} | average {:.2}", student, average))?;
        }
        Ok(())
    }

    fn show_list<T: fmt::Display>(&mut self, items: &[T], empty: &str) -> io::Result<()> {
        if items.is_empty() {
            self.out.line(empty)
        } else {
            self.out.list(items, "")
        }
    }
}

fn describe(value: Option<GradeValue>) -> String {
    value.map_or_else(|| "ungraded".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::OperationLog;
    use crate::store::Repositories;
    use crate::ui::output::Verbosity;
    use std::io::Cursor;

    fn run_script(script: &str, verbosity: Verbosity) -> String {
        let book = Gradebook::new(Repositories::in_memory(), OperationLog::shared(None));
        let today = parse_date("2025-03-15").unwrap();
        let mut shell = Shell::new(
            book,
            Cursor::new(script.as_bytes().to_vec()),
            Output::new(Vec::new(), verbosity),
            today,
        );
        shell.run().unwrap();
        String::from_utf8(shell.into_output().into_inner()).unwrap()
    }

    #[test]
    fn menu_numbers_round_trip() {
        for item in MenuItem::ALL {
            assert_eq!(item.number().to_string().parse::<MenuItem>().unwrap(), item);
        }
        assert!("11".parse::<MenuItem>().is_err());
    }

    #[test]
    fn exit_ends_session() {
        let text = run_script("0\n", Verbosity::Normal);
        assert!(text.contains("9. Undo"));
        assert!(text.contains("10. Redo"));
        assert!(text.contains("0. Exit"));
    }

    #[test]
    fn eof_ends_session() {
        let text = run_script("", Verbosity::Quiet);
        assert_eq!(text, "");
    }

    #[test]
    fn undo_on_empty_history_reports_and_continues() {
        let text = run_script("9\n10\n0\n", Verbosity::Quiet);
        assert_eq!(text, "error: nothing to undo\nerror: nothing to redo\n");
    }

    #[test]
    fn add_undo_redo_list() {
        let script = "1\n1\n1234\nAda Lovelace\n911\n9\n1\n4\n10\n1\n4\n0\n";
        let text = run_script(script, Verbosity::Quiet);
        assert_eq!(text, "No students.\n1234 - Ada Lovelace - group 911\n");
    }

    #[test]
    fn invalid_answers_are_reasked() {
        let script = "1\n1\nabc\n7\nAda\n911\n1\n4\n0\n";
        let text = run_script(script, Verbosity::Quiet);
        assert!(text.starts_with("error: "));
        assert!(text.ends_with("7 - Ada - group 911\n"));
    }

    #[test]
    fn service_errors_are_printed() {
        let text = run_script("1\n2\n5\n0\n", Verbosity::Quiet);
        assert_eq!(text, "error: student 5 not found\n");
    }

    #[test]
    fn unknown_option_is_reported() {
        let text = run_script("42\n0\n", Verbosity::Quiet);
        assert_eq!(text, "error: unknown option '42'\n");
    }

    #[test]
    fn grading_flow_and_reports() {
        let script = concat!(
            "1\n1\n1\nAda\n911\n",     // add student 1
            "1\n1\n2\nBob\n911\n",     // add student 2
            "2\n1\n10\nEssay\n2025-01-01\n", // add overdue assignment
            "3\n2\n10\n911\n",         // give to group 911
            "4\n1\n10\n8\n",           // grade Ada
            "6\n10\n",                 // ranking
            "7\n",                     // late students
            "8\n",                     // best students
            "0\n",
        );
        let text = run_script(script, Verbosity::Quiet);
        assert_eq!(
            text,
            "1. 1 - Ada - group 911 | 8\n\
             2. 2 - Bob - group 911 | ungraded\n\
             2 - Bob - group 911\n\
             1 - Ada - group 911 | average 8.00\n\
             2 - Bob - group 911 | average 0.00\n"
        );
    }
}
