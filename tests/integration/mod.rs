//! Integration tests for the gradebook binary.
//!
//! These tests run the real executable with scripted stdin against
//! temporary data directories.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running gradebook, isolated from the user's config.
fn gradebook(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gradebook").unwrap();
    cmd.current_dir(home)
        .env_remove("GRADEBOOK_CONFIG")
        .env_remove("GRADEBOOK_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn version_flag_works() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradebook"));
}

#[test]
fn help_flag_works() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("undo/redo"));
}

#[test]
fn config_command_shows_overrides() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .args(["--storage", "json", "--history-limit", "5", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind = \"json\""))
        .stdout(predicate::str::contains("limit = 5"));
}

#[test]
fn local_config_file_is_used() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("gradebook.toml"),
        "[storage]\nkind = \"text\"\ndirectory = \"data\"\n",
    )
    .unwrap();

    gradebook(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("kind = \"text\""))
        .stdout(predicate::str::contains("gradebook.toml"));
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("gradebook.toml"), "[storage]\nkind = \"pickle\"\n").unwrap();

    gradebook(temp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .args(["--config", "nope.toml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn shell_exits_on_end_of_input() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .arg("shell")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("9. Undo"));
}

#[test]
fn shell_reports_empty_history() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .args(["-q", "shell"])
        .write_stdin("9\n10\n0\n")
        .assert()
        .success()
        .stdout("error: nothing to undo\nerror: nothing to redo\n");
}

#[test]
fn shell_changes_persist_between_runs() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    let data = data.to_str().unwrap();

    gradebook(temp.path())
        .args(["-q", "--storage", "json", "--data-dir", data])
        .write_stdin("1\n1\n5\nAda Lovelace\n911\n1\n1\n6\nGrace Hopper\n912\n9\n0\n")
        .assert()
        .success()
        .stdout("");

    gradebook(temp.path())
        .args(["-q", "--storage", "json", "--data-dir", data, "shell"])
        .write_stdin("1\n4\n0\n")
        .assert()
        .success()
        .stdout("5 - Ada Lovelace - group 911\n");
}

#[test]
fn sample_data_seeds_empty_store() {
    let temp = TempDir::new().unwrap();
    gradebook(temp.path())
        .args(["shell", "--sample", "--sample-size", "3", "--seed", "9"])
        .write_stdin("1\n4\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 students, 3 assignments"))
        .stdout(predicate::str::is_match(r"\d{4} - .+ - group 9\d\d").unwrap());
}
