//! store::traits
//!
//! The record and repository abstractions shared by every backend.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::StoreError;

/// A value that can be kept in a [`Repository`].
///
/// Besides its key, a record knows how to write itself as one line of the
/// text format and how to read that line back.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + 'static {
    /// Unique key within a repository.
    type Key: Copy + Ord + fmt::Debug + fmt::Display + 'static;

    /// Human-readable kind, used in error messages ("student", "grade").
    const KIND: &'static str;

    /// This record's key.
    fn key(&self) -> Self::Key;

    /// Encode as a single line of the text format (no trailing newline).
    fn to_line(&self) -> String;

    /// Decode a line written by [`Record::to_line`].
    ///
    /// Returns a plain message on failure; the caller adds path and line
    /// number.
    fn from_line(line: &str) -> Result<Self, String>;
}

/// Keyed storage for one kind of record.
///
/// Every mutation either fully succeeds or leaves the repository unchanged.
pub trait Repository<R: Record> {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// `StoreError::Duplicate` if the key is already present.
    fn add(&mut self, record: R) -> Result<(), StoreError>;

    /// Remove and return the record with `key`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the key is absent.
    fn remove(&mut self, key: R::Key) -> Result<R, StoreError>;

    /// Replace the record with the same key, returning the previous value.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if the key is absent.
    fn update(&mut self, record: R) -> Result<R, StoreError>;

    /// Remove every record matching `predicate`, returning them in key order.
    fn remove_where(&mut self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError>;

    /// Look up a record by key.
    fn find(&self, key: R::Key) -> Option<R>;

    /// All records in key order.
    fn list(&self) -> Vec<R>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: R::Key) -> bool {
        self.find(key).is_some()
    }

    /// All records matching `predicate`, in key order.
    fn filter(&self, predicate: &dyn Fn(&R) -> bool) -> Vec<R> {
        self.list().into_iter().filter(|r| predicate(r)).collect()
    }
}
