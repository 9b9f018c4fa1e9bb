//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: file names must be non-empty
//! and the history limit, when present, must be at least one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [storage]
/// kind = "text"
/// directory = "data"
/// students = "students.txt"
///
/// [history]
/// limit = 100
///
/// [session]
/// sample_size = 20
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GradebookConfig {
    /// Where records live
    pub storage: StorageConfig,

    /// Undo/redo settings
    pub history: HistoryConfig,

    /// Interactive session settings
    pub session: SessionConfig,
}

impl GradebookConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;

        if self.history.limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "history.limit must be at least 1 (omit it for unlimited history)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Records live only for the session
    #[default]
    Memory,
    /// One comma-separated record per line
    Text,
    /// A JSON array per file
    Json,
}

impl StorageKind {
    /// Valid names accepted in config files and on the command line.
    pub const NAMES: [&'static str; 3] = ["memory", "text", "json"];

    /// File extension used for default file names.
    pub fn extension(self) -> &'static str {
        match self {
            StorageKind::Memory => "",
            StorageKind::Text => "txt",
            StorageKind::Json => "json",
        }
    }

    pub fn is_persistent(self) -> bool {
        self != StorageKind::Memory
    }
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" => Ok(StorageKind::Memory),
            "text" | "textfiles" => Ok(StorageKind::Text),
            "json" | "jsonfiles" => Ok(StorageKind::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "invalid storage kind '{}', must be one of: {}",
                other,
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Memory => "memory",
            StorageKind::Text => "text",
            StorageKind::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Backend kind (default: memory)
    pub kind: StorageKind,

    /// Directory that relative file names are resolved against
    pub directory: Option<PathBuf>,

    /// Students file name
    pub students: Option<String>,

    /// Assignments file name
    pub assignments: Option<String>,

    /// Grades file name
    pub grades: Option<String>,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("students", &self.students),
            ("assignments", &self.assignments),
            ("grades", &self.grades),
        ] {
            if let Some(name) = value {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "storage.{} cannot be empty",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    /// Path of the students file.
    pub fn students_path(&self) -> PathBuf {
        self.resolve(self.students.as_deref(), "students")
    }

    /// Path of the assignments file.
    pub fn assignments_path(&self) -> PathBuf {
        self.resolve(self.assignments.as_deref(), "assignments")
    }

    /// Path of the grades file.
    pub fn grades_path(&self) -> PathBuf {
        self.resolve(self.grades.as_deref(), "grades")
    }

    fn resolve(&self, configured: Option<&str>, stem: &str) -> PathBuf {
        let name = match configured {
            Some(name) => PathBuf::from(name),
            None => Path::new(stem).with_extension(self.kind.extension()),
        };
        match &self.directory {
            Some(dir) if name.is_relative() => dir.join(name),
            _ => name,
        }
    }
}

/// Undo/redo settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of undoable operations (unlimited when absent)
    pub limit: Option<usize>,
}

/// Interactive session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of records generated by `--sample`
    pub sample_size: Option<usize>,
}
