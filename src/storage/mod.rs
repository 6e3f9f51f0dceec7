//! Record store access.
//!
//! The statistics engine only ever reads. It needs two capabilities:
//! - filtered queries over semester records
//! - identity lookups for leaderboard display names
//!
//! Backends:
//! - `MemoryStore`: records held in memory (embedding, tests)
//! - `JsonlStore`: JSONL files in a data directory, re-read on every query

pub mod jsonl;
pub mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AcademicYear, Period, Semester, SemesterRecord, StudentIdentity};

pub use jsonl::{JsonlReader, JsonlStore};
pub use memory::MemoryStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.jsonl")
    }

    pub fn identities_path(&self) -> PathBuf {
        self.data_dir.join("identities.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Equality/membership filter over semester records.
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub user_id: Option<String>,
    pub academic_year: Option<AcademicYear>,
    pub semester: Option<Semester>,
    pub cursus: Option<String>,
    pub filiere: Option<String>,
    pub groupe: Option<String>,
    /// Branch membership; `""` matches records without a branch
    pub branch_in: Option<Vec<String>>,
}

impl RecordFilter {
    /// Match every record of one period.
    pub fn for_period(period: Period) -> Self {
        Self {
            academic_year: Some(period.academic_year),
            semester: Some(period.semester),
            ..Self::default()
        }
    }

    /// Match every record of one student.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_cursus(mut self, cursus: impl Into<String>) -> Self {
        self.cursus = Some(cursus.into());
        self
    }

    pub fn with_filiere(mut self, filiere: impl Into<String>) -> Self {
        self.filiere = Some(filiere.into());
        self
    }

    pub fn with_groupe(mut self, groupe: impl Into<String>) -> Self {
        self.groupe = Some(groupe.into());
        self
    }

    pub fn with_branch_in(mut self, branches: Vec<String>) -> Self {
        self.branch_in = Some(branches);
        self
    }

    /// Check whether a record passes this filter.
    pub fn matches(&self, record: &SemesterRecord) -> bool {
        fn eq(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |e| e == actual)
        }

        if self.academic_year.is_some_and(|y| y != record.academic_year) {
            return false;
        }
        if self.semester.is_some_and(|s| s != record.semester) {
            return false;
        }
        if let Some(branches) = &self.branch_in {
            let branch = record.branch().unwrap_or("");
            if !branches.iter().any(|b| b.trim() == branch) {
                return false;
            }
        }

        eq(&self.user_id, &record.user_id)
            && eq(&self.cursus, &record.cursus)
            && eq(&self.filiere, &record.filiere)
            && eq(&self.groupe, &record.groupe)
    }
}

/// Read-only access to semester records and student identities.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// All records matching the filter, in no particular order.
    async fn find_records(&self, filter: &RecordFilter)
        -> Result<Vec<SemesterRecord>, StorageError>;

    /// Identities for the given students. Unknown ids are simply missing.
    async fn find_identities(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<StudentIdentity>, StorageError>;
}
