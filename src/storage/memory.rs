//! In-memory record store.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{RecordFilter, RecordStore, StorageError};
use crate::models::{SemesterRecord, StudentIdentity};

/// Records and identities held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SemesterRecord>,
    identities: HashMap<String, StudentIdentity>,
}

impl MemoryStore {
    pub fn new(records: Vec<SemesterRecord>) -> Self {
        Self {
            records,
            identities: HashMap::new(),
        }
    }

    /// Builder method to register identities.
    pub fn with_identities(mut self, identities: Vec<StudentIdentity>) -> Self {
        for identity in identities {
            self.identities.insert(identity.user_id.clone(), identity);
        }
        self
    }

    pub fn insert(&mut self, record: SemesterRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<SemesterRecord>, StorageError> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn find_identities(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentIdentity>, StorageError> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.identities.get(id))
            .cloned()
            .collect())
    }
}
