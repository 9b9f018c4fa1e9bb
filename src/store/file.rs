//! store::file
//!
//! File-backed repository.
//!
//! # Persistence
//!
//! The whole collection is loaded when the repository is opened and written
//! back after every successful mutation. Writes are atomic (write to a temp
//! file in the same directory, then rename). If the write fails, the
//! in-memory change is rolled back so memory and disk never disagree.
//!
//! # Formats
//!
//! - [`FileFormat::Text`] - one record per line, see [`super::record`]
//! - [`FileFormat::Json`] - a pretty-printed JSON array

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::memory::MemoryRepository;
use super::traits::{Record, Repository};
use super::StoreError;

/// On-disk encoding of a repository file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    Json,
}

/// Repository persisted to a single file.
#[derive(Debug)]
pub struct FileRepository<R: Record> {
    path: PathBuf,
    format: FileFormat,
    inner: MemoryRepository<R>,
}

impl<R: Record> FileRepository<R> {
    /// Open the repository at `path`, loading existing records.
    ///
    /// A missing file is an empty repository; it is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if it contains two records with the same key.
    pub fn open(path: impl Into<PathBuf>, format: FileFormat) -> Result<Self, StoreError> {
        let path = path.into();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            match format {
                FileFormat::Text => decode_lines(&path, &contents)?,
                FileFormat::Json => decode_json(&path, &contents)?,
            }
        } else {
            Vec::new()
        };

        let inner = MemoryRepository::from_records(records)?;
        tracing::debug!(
            path = %path.display(),
            kind = R::KIND,
            records = inner.len(),
            "opened file repository"
        );

        Ok(Self {
            path,
            format,
            inner,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to the in-memory records and persist the result.
    ///
    /// Rolls back the in-memory change if persisting fails.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryRepository<R>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let snapshot = self.inner.clone();
        let out = change(&mut self.inner)?;
        if let Err(e) = self.save() {
            self.inner = snapshot;
            tracing::warn!(path = %self.path.display(), error = %e, "rolled back unsaved change");
            return Err(e);
        }
        Ok(out)
    }

    /// Write every record to disk atomically.
    fn save(&self) -> Result<(), StoreError> {
        let records = self.inner.list();
        let contents = match self.format {
            FileFormat::Text => {
                let mut out = String::new();
                for record in &records {
                    out.push_str(&record.to_line());
                    out.push('\n');
                }
                out
            }
            FileFormat::Json => {
                serde_json::to_string_pretty(&records).map_err(|e| StoreError::Encode {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?
            }
        };
        write_atomic(&self.path, contents.as_bytes())
    }
}

impl<R: Record> Repository<R> for FileRepository<R> {
    fn add(&mut self, record: R) -> Result<(), StoreError> {
        self.commit(|inner| inner.add(record))
    }

    fn remove(&mut self, key: R::Key) -> Result<R, StoreError> {
        self.commit(|inner| inner.remove(key))
    }

    fn update(&mut self, record: R) -> Result<R, StoreError> {
        self.commit(|inner| inner.update(record))
    }

    fn remove_where(&mut self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        if !self.inner.list().iter().any(|r| predicate(r)) {
            return Ok(Vec::new());
        }
        self.commit(|inner| inner.remove_where(predicate))
    }

    fn find(&self, key: R::Key) -> Option<R> {
        self.inner.find(key)
    }

    fn list(&self) -> Vec<R> {
        self.inner.list()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

fn decode_lines<R: Record>(path: &Path, contents: &str) -> Result<Vec<R>, StoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            R::from_line(line).map_err(|message| StoreError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            })
        })
        .collect()
}

fn decode_json<R: Record>(path: &Path, contents: &str) -> Result<Vec<R>, StoreError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        line: e.line(),
        message: e.to_string(),
    })
}

/// Write `contents` to `path` via a temp file and rename.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Write to temp file in same directory (for atomic rename)
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let write_temp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()
    };
    let result = write_temp()
        .map_err(|e| StoreError::Io {
            path: temp_path.clone(),
            source: e,
        })
        .and_then(|()| {
            fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        });

    if result.is_err() {
        // Nothing to report if the temp file was never created.
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Grade, Student};
    use crate::core::types::{AssignmentId, GradeValue, GroupId, StudentId};
    use tempfile::TempDir;

    fn student(id: u32, name: &str) -> Student {
        Student::new(StudentId::new(id), name, GroupId::new(911)).unwrap()
    }

    #[test]
    fn text_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");

        let mut repo: FileRepository<Student> =
            FileRepository::open(&path, FileFormat::Text).unwrap();
        repo.add(student(2, "Grace Hopper")).unwrap();
        repo.add(student(1, "Ada Lovelace")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1,911,Ada Lovelace\n2,911,Grace Hopper\n");

        let reopened: FileRepository<Student> =
            FileRepository::open(&path, FileFormat::Text).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.find(StudentId::new(2)).unwrap().name, "Grace Hopper");
    }

    #[test]
    fn json_persists_every_mutation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/grades.json");

        let mut repo: FileRepository<Grade> =
            FileRepository::open(&path, FileFormat::Json).unwrap();
        let grade = Grade::pending(AssignmentId::new(1), StudentId::new(2));
        repo.add(grade.clone()).unwrap();
        repo.update(grade.with_value(Some(GradeValue::new(9).unwrap())))
            .unwrap();

        let reopened: FileRepository<Grade> =
            FileRepository::open(&path, FileFormat::Json).unwrap();
        assert_eq!(
            reopened.find(grade.key()).unwrap().value.map(GradeValue::get),
            Some(9)
        );

        repo.remove(grade.key()).unwrap();
        let reopened: FileRepository<Grade> =
            FileRepository::open(&path, FileFormat::Json).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let repo: FileRepository<Student> =
            FileRepository::open(temp.path().join("absent.txt"), FileFormat::Text).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn malformed_line_reports_position() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");
        fs::write(&path, "1,911,Ada\n\nnot-a-number,911,Bob\n").unwrap();

        let err = FileRepository::<Student>::open(&path, FileFormat::Text).unwrap_err();
        match err {
            StoreError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_keys_in_file_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");
        fs::write(&path, "1,911,Ada\n1,912,Bob\n").unwrap();

        assert!(matches!(
            FileRepository::<Student>::open(&path, FileFormat::Text),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn failed_mutation_leaves_file_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");
        let mut repo: FileRepository<Student> =
            FileRepository::open(&path, FileFormat::Text).unwrap();
        repo.add(student(1, "Ada")).unwrap();

        assert!(repo.add(student(1, "Imposter")).is_err());
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1,911,Ada\n");
    }

    #[test]
    fn failed_save_rolls_back_memory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");
        let mut repo: FileRepository<Student> =
            FileRepository::open(&path, FileFormat::Text).unwrap();
        // A directory where the temp file should go makes the write fail.
        fs::create_dir(temp.path().join("students.txt.tmp")).unwrap();

        let err = repo.add(student(1, "Ada")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(repo.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("students.txt");
        let mut repo: FileRepository<Student> =
            FileRepository::open(&path, FileFormat::Json).unwrap();
        repo.add(student(1, "Ada")).unwrap();

        // Replace the data file with a directory so the rename fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(repo.add(student(2, "Grace")).is_err());
        assert_eq!(repo.len(), 1);
        assert!(repo.find(StudentId::new(2)).is_none());
        assert!(!temp.path().join("students.txt.tmp").exists());
    }
}
