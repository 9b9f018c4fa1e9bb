//! store::memory
//!
//! In-memory repository backed by an ordered map.

use std::collections::BTreeMap;

use super::traits::{Record, Repository};
use super::StoreError;

/// Repository that keeps records only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct MemoryRepository<R: Record> {
    records: BTreeMap<R::Key, R>,
}

impl<R: Record> MemoryRepository<R> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Build a repository from existing records.
    ///
    /// # Errors
    ///
    /// `StoreError::Duplicate` if two records share a key.
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Result<Self, StoreError> {
        let mut repo = Self::new();
        for record in records {
            repo.add(record)?;
        }
        Ok(repo)
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Repository<R> for MemoryRepository<R> {
    fn add(&mut self, record: R) -> Result<(), StoreError> {
        let key = record.key();
        if self.records.contains_key(&key) {
            return Err(StoreError::Duplicate {
                kind: R::KIND,
                key: key.to_string(),
            });
        }
        self.records.insert(key, record);
        Ok(())
    }

    fn remove(&mut self, key: R::Key) -> Result<R, StoreError> {
        self.records.remove(&key).ok_or_else(|| StoreError::NotFound {
            kind: R::KIND,
            key: key.to_string(),
        })
    }

    fn update(&mut self, record: R) -> Result<R, StoreError> {
        let key = record.key();
        match self.records.get_mut(&key) {
            Some(slot) => Ok(std::mem::replace(slot, record)),
            None => Err(StoreError::NotFound {
                kind: R::KIND,
                key: key.to_string(),
            }),
        }
    }

    fn remove_where(&mut self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        let keys: Vec<R::Key> = self
            .records
            .iter()
            .filter(|(_, record)| predicate(record))
            .map(|(key, _)| *key)
            .collect();

        Ok(keys
            .into_iter()
            .filter_map(|key| self.records.remove(&key))
            .collect())
    }

    fn find(&self, key: R::Key) -> Option<R> {
        self.records.get(&key).cloned()
    }

    fn list(&self) -> Vec<R> {
        self.records.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
