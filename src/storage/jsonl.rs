//! JSONL (JSON Lines) record store.
//!
//! Each line is a valid JSON object representing one entity. Files are
//! re-read on every query so each request sees a fresh snapshot.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{RecordFilter, RecordStore, StorageConfig, StorageError};
use crate::models::{SemesterRecord, StudentIdentity};

/// JSONL file reader.
#[derive(Debug, Clone)]
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        self.read_where(|_| true)
    }

    /// Read entities matching a predicate.
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<T>(&line) {
                Ok(entity) if predicate(&entity) => entities.push(entity),
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Record store backed by `records.jsonl` and `identities.jsonl`.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

#[async_trait]
impl RecordStore for JsonlStore {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn find_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<SemesterRecord>, StorageError> {
        let reader = JsonlReader::<SemesterRecord>::new(self.config.records_path());
        let filter = filter.clone();

        tokio::task::spawn_blocking(move || reader.read_where(|r| filter.matches(r)))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }

    async fn find_identities(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentIdentity>, StorageError> {
        let reader = JsonlReader::<StudentIdentity>::new(self.config.identities_path());
        let wanted: HashSet<String> = user_ids.iter().cloned().collect();

        tokio::task::spawn_blocking(move || reader.read_where(|i| wanted.contains(&i.user_id)))
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }
}
