//! store
//!
//! Record storage backends.
//!
//! # Modules
//!
//! - [`traits`] - The `Record` and `Repository` abstractions
//! - [`memory`] - Process-lifetime storage
//! - [`file`] - Text or JSON file storage with atomic writes
//! - [`record`] - Record implementations for the domain model
//!
//! # Sharing
//!
//! Services and the undo closures they record both need access to the same
//! repositories, so each repository is handed out as a [`Shared`] trait
//! object.
//!
//! # Example
//!
//! ```
//! use gradebook::core::config::StorageConfig;
//! use gradebook::store::Repositories;
//!
//! let repos = Repositories::open(&StorageConfig::default()).unwrap();
//! assert!(repos.students.borrow().is_empty());
//! ```

pub mod file;
pub mod memory;
pub mod record;
pub mod traits;

pub use file::{FileFormat, FileRepository};
pub use memory::MemoryRepository;
pub use traits::{Record, Repository};

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::core::config::{StorageConfig, StorageKind};
use crate::core::model::{Assignment, Grade, Student};

/// A repository shared between services and recorded undo actions.
pub type Shared<R> = Rc<RefCell<dyn Repository<R>>>;

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this key is already stored.
    #[error("{kind} {key} already exists")]
    Duplicate { kind: &'static str, key: String },

    /// No record with this key is stored.
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// Reading or writing the backing file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file holds something that is not a valid record.
    #[error("failed to parse '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Records could not be serialized.
    #[error("failed to encode '{path}': {message}")]
    Encode { path: PathBuf, message: String },
}

/// The three repositories a session works with.
#[derive(Clone)]
pub struct Repositories {
    pub students: Shared<Student>,
    pub assignments: Shared<Assignment>,
    pub grades: Shared<Grade>,
}

impl Repositories {
    /// Fresh, empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            students: share(MemoryRepository::<Student>::new()),
            assignments: share(MemoryRepository::<Assignment>::new()),
            grades: share(MemoryRepository::<Grade>::new()),
        }
    }

    /// Open the repositories described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a backing file exists but cannot be loaded.
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        let format = match config.kind {
            StorageKind::Memory => return Ok(Self::in_memory()),
            StorageKind::Text => FileFormat::Text,
            StorageKind::Json => FileFormat::Json,
        };

        Ok(Self {
            students: share(FileRepository::<Student>::open(
                config.students_path(),
                format,
            )?),
            assignments: share(FileRepository::<Assignment>::open(
                config.assignments_path(),
                format,
            )?),
            grades: share(FileRepository::<Grade>::open(config.grades_path(), format)?),
        })
    }

    /// True when no records of any kind are stored.
    pub fn is_empty(&self) -> bool {
        self.students.borrow().is_empty()
            && self.assignments.borrow().is_empty()
            && self.grades.borrow().is_empty()
    }
}

/// Wrap a concrete repository as a [`Shared`] trait object.
pub fn share<R: Record>(repo: impl Repository<R> + 'static) -> Shared<R> {
    Rc::new(RefCell::new(repo))
}
