//! Statistics orchestration.
//!
//! One call to [`StatisticsEngine::compute_statistics`] resolves the target
//! student's record, picks a baseline record for comparison and then computes
//! the four grouping levels concurrently. Each level reads its own current and
//! baseline populations from the record store; everything after the reads is
//! pure.
//!
//! A level that hits an aggregation error (or panics) is reported in
//! `StatisticsResult::failures` while the other levels still complete. A
//! storage error fails the whole request.

pub mod level;
pub mod subjects;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::calculate::rank::Candidate;
use crate::calculate::rank_students;
use crate::config::{PreviousPeriodRule, StatisticsConfig};
use crate::models::{
    AcademicYear, GroupingLevel, LevelFailure, LevelStats, Period, RankEntry, Semester,
    SemesterRecord, Standing, StatisticsResult, StudentIdentity,
};
use crate::storage::{RecordFilter, RecordStore, StorageError};

pub use level::{compute_level, LevelError, LevelScope};
pub use subjects::build_subject_stats;

/// Errors surfaced to callers of the engine.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("No record for student {user_id} in {period}")]
    RecordNotFound { user_id: String, period: Period },

    #[error("Student {user_id} has no grades yet for {period}")]
    NoGradesYet { user_id: String, period: Period },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Everything a ranking needs besides the candidates themselves.
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// The student the statistics are computed for
    pub user_id: &'a str,
    pub identities: &'a HashMap<String, StudentIdentity>,
    pub anonymous_name: &'a str,
    pub leaderboard_size: usize,
}

impl<'a> RankingContext<'a> {
    pub fn rank(&self, candidates: &[Candidate]) -> Vec<RankEntry> {
        rank_students(candidates, self.identities, self.anonymous_name)
    }

    /// The target student's standing in a full (untruncated) ranking.
    pub fn standing_of(&self, ranking: &[RankEntry]) -> Option<Standing> {
        ranking
            .iter()
            .find(|e| e.user_id == self.user_id)
            .map(|e| Standing {
                rank: e.rank,
                average: e.average,
            })
    }

    /// Cut a ranking down to the leaderboard size.
    pub fn top<T>(&self, mut ranking: Vec<T>) -> Vec<T> {
        ranking.truncate(self.leaderboard_size);
        ranking
    }
}

#[derive(Debug, Error)]
enum LevelJobError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Computes per-student statistics against a record store.
#[derive(Clone)]
pub struct StatisticsEngine {
    store: Arc<dyn RecordStore>,
    config: StatisticsConfig,
}

impl StatisticsEngine {
    pub fn new(store: Arc<dyn RecordStore>, config: StatisticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Compute the full statistics tree for one student and period.
    pub async fn compute_statistics(
        &self,
        user_id: &str,
        semester: Semester,
        academic_year: AcademicYear,
    ) -> Result<StatisticsResult, StatsError> {
        let period = Period::new(academic_year, semester);
        debug!("Computing statistics for {} in {}", user_id, period);

        let mut history = self
            .store
            .find_records(&RecordFilter::for_user(user_id))
            .await?;
        history.sort_by_key(|r| r.period());

        let target = history
            .iter()
            .find(|r| r.period() == period)
            .cloned()
            .ok_or_else(|| StatsError::RecordNotFound {
                user_id: user_id.to_string(),
                period,
            })?;

        if target.average.is_none() {
            return Err(StatsError::NoGradesYet {
                user_id: user_id.to_string(),
                period,
            });
        }

        let previous = self.previous_record(&history, period);
        match &previous {
            Some(record) => debug!("Comparing {} against {}", period, record.period()),
            None => debug!("No baseline record for {} before {}", user_id, period),
        }

        let mut result = StatisticsResult::new(user_id, period);
        result.previous_period = previous.as_ref().map(|r| r.period());

        let target = Arc::new(target);
        let previous = previous.map(Arc::new);

        let handles: Vec<_> = GroupingLevel::ALL
            .iter()
            .map(|&level| {
                let job = run_level(
                    self.store.clone(),
                    self.config.clone(),
                    level,
                    target.clone(),
                    previous.clone(),
                );
                (level, tokio::spawn(job))
            })
            .collect();

        // Not a `for` loop: a storage error aborts the tasks still pending.
        let mut handles = handles.into_iter();
        while let Some((level, handle)) = handles.next() {
            match handle.await {
                Ok(Ok(stats)) => {
                    if stats.is_none() {
                        debug!("Empty {} population for {}", level, user_id);
                    }
                    result.set_level(level, stats);
                }
                Ok(Err(LevelJobError::Storage(e))) => {
                    for (_, pending) in handles.by_ref() {
                        pending.abort();
                    }
                    return Err(e.into());
                }
                Ok(Err(LevelJobError::Level(e))) => {
                    error!("Failed to compute {} statistics for {}: {}", level, user_id, e);
                    result.failures.push(LevelFailure {
                        level,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    error!("{} statistics task for {} aborted: {}", level, user_id, e);
                    result.failures.push(LevelFailure {
                        level,
                        message: format!("Level task aborted: {}", e),
                    });
                }
            }
        }

        info!(
            "Computed statistics for {} in {} ({} levels failed)",
            user_id,
            period,
            result.failures.len()
        );
        Ok(result)
    }

    /// Every period the student has a record for, oldest first.
    pub async fn student_periods(&self, user_id: &str) -> Result<Vec<Period>, StatsError> {
        let records = self
            .store
            .find_records(&RecordFilter::for_user(user_id))
            .await?;

        let periods: BTreeSet<Period> = records.iter().map(|r| r.period()).collect();
        Ok(periods.into_iter().collect())
    }

    /// Pick the baseline record from a history sorted by period.
    fn previous_record(&self, history: &[SemesterRecord], period: Period) -> Option<SemesterRecord> {
        let wanted = match self.config.previous_period {
            PreviousPeriodRule::StudentHistory => {
                return history.iter().rev().find(|r| r.period() < period).cloned();
            }
            PreviousPeriodRule::PriorSemester => period.prior_semester()?,
            PreviousPeriodRule::PriorYear => period.prior_year(),
        };

        history.iter().find(|r| r.period() == wanted).cloned()
    }
}

/// Read one level's populations and compute its block.
async fn run_level(
    store: Arc<dyn RecordStore>,
    config: StatisticsConfig,
    level: GroupingLevel,
    target: Arc<SemesterRecord>,
    previous: Option<Arc<SemesterRecord>>,
) -> Result<Option<LevelStats>, LevelJobError> {
    let scope = LevelScope::around(level, &target);
    let baseline_scope = previous.as_deref().map(|r| LevelScope::around(level, r));

    let (current, baseline) = tokio::try_join!(store.find_records(&scope.filter), async {
        match &baseline_scope {
            Some(s) => store.find_records(&s.filter).await,
            None => Ok(Vec::new()),
        }
    })?;

    let current = scope.population(current);
    let baseline = match &baseline_scope {
        Some(s) => s.population(baseline),
        None => Vec::new(),
    };

    // Subject and module rankings include students without an overall average.
    let user_ids: Vec<String> = current.iter().map(|r| r.user_id.clone()).collect();
    let identities: HashMap<String, StudentIdentity> = store
        .find_identities(&user_ids)
        .await?
        .into_iter()
        .map(|i| (i.user_id.clone(), i))
        .collect();

    debug!(
        "{} population {}: {} current, {} baseline",
        level,
        scope.name,
        current.len(),
        baseline.len()
    );

    let ctx = RankingContext {
        user_id: &target.user_id,
        identities: &identities,
        anonymous_name: &config.anonymous_name,
        leaderboard_size: config.leaderboard_size,
    };

    Ok(compute_level(&scope, &current, &baseline, &ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn year() -> AcademicYear {
        AcademicYear::new(2025)
    }

    fn s(n: u8) -> Semester {
        Semester::new(n).unwrap()
    }

    fn period() -> Period {
        Period::new(year(), s(5))
    }

    fn record(user: &str, groupe: &str, average: Option<f64>) -> SemesterRecord {
        record_in(period(), user, groupe, average)
    }

    fn record_in(period: Period, user: &str, groupe: &str, average: Option<f64>) -> SemesterRecord {
        let mut r = SemesterRecord::new(user, period, "ING", "INFO", groupe);
        r.average = average;
        r
    }

    fn engine(records: Vec<SemesterRecord>) -> StatisticsEngine {
        engine_with(records, StatisticsConfig::default())
    }

    fn engine_with(records: Vec<SemesterRecord>, config: StatisticsConfig) -> StatisticsEngine {
        StatisticsEngine::new(Arc::new(MemoryStore::new(records)), config)
    }

    /// Four students of one filiere, D ungraded.
    fn reference_population() -> Vec<SemesterRecord> {
        vec![
            record("A", "G1", Some(15.0)),
            record("B", "G1", Some(10.0)),
            record("C", "G2", Some(20.0)),
            record("D", "G2", None),
        ]
    }

    #[tokio::test]
    async fn test_reference_population() {
        let engine = engine(reference_population());
        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();

        let filiere = result.filiere.as_ref().unwrap();
        let ranking: Vec<_> = filiere
            .student_ranking
            .iter()
            .map(|e| (e.user_id.as_str(), e.rank))
            .collect();
        assert_eq!(ranking, vec![("C", 1), ("A", 2), ("B", 3)]);
        assert_eq!(filiere.student.rank, 2);
        assert_eq!(filiere.group_average.current, 15.0);
        assert_eq!(filiere.summary.median, 15.0);

        let groups: Vec<_> = filiere
            .group_ranking
            .iter()
            .map(|g| (g.group.as_str(), g.average))
            .collect();
        assert_eq!(groups, vec![("G2", 20.0), ("G1", 12.5)]);

        let cursus = result.cursus.as_ref().unwrap();
        assert_eq!(cursus.name, "ING");
        assert_eq!(cursus.group_ranking.len(), 2);
        assert_eq!(cursus.group_ranking[0].group, "INFO");

        let spe = result.spe.as_ref().unwrap();
        assert_eq!(spe.name, "G1");
        assert_eq!(spe.ranked_count, 2);
        assert_eq!(spe.student.rank, 1);

        assert!(result.failures.is_empty());
        assert!(result.previous_period.is_none());
    }

    #[tokio::test]
    async fn test_branch_fallback() {
        let engine = engine(vec![
            record("a", "B", Some(12.0)).with_branch("B2"),
            record("b", "B2", Some(14.0)),
            record("c", "B", Some(16.0)).with_branch("B1"),
        ]);

        let result = engine.compute_statistics("a", s(5), year()).await.unwrap();
        let branch = result.branch.as_ref().unwrap();

        assert_eq!(branch.name, "B2");
        let members: Vec<_> = branch
            .student_ranking
            .iter()
            .map(|e| e.user_id.as_str())
            .collect();
        assert_eq!(members, vec!["b", "a"]);
        assert!(branch.group_ranking.iter().all(|g| g.group == "B2"));
    }

    #[tokio::test]
    async fn test_record_not_found() {
        let engine = engine(reference_population());

        let err = engine.compute_statistics("Z", s(5), year()).await.unwrap_err();
        assert!(matches!(err, StatsError::RecordNotFound { .. }));

        let err = engine.compute_statistics("A", s(6), year()).await.unwrap_err();
        assert!(matches!(err, StatsError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_no_grades_yet() {
        let engine = engine(reference_population());

        let err = engine.compute_statistics("D", s(5), year()).await.unwrap_err();
        assert!(matches!(err, StatsError::NoGradesYet { .. }));
        assert!(err.to_string().contains("no grades yet"));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let mut records = reference_population();
        records.reverse();
        let engine = engine(records);

        let first = engine.compute_statistics("B", s(5), year()).await.unwrap();
        let second = engine.compute_statistics("B", s(5), year()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_previous_period_deltas() {
        let s4 = Period::new(year(), s(4));
        let mut records = reference_population();
        records.extend([
            record_in(s4, "A", "G1", Some(11.0)),
            record_in(s4, "B", "G1", Some(13.0)),
            record_in(s4, "C", "G2", Some(9.0)),
        ]);
        let engine = engine(records);

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        assert_eq!(result.previous_period, Some(s4));

        let filiere = result.filiere.as_ref().unwrap();
        assert_eq!(filiere.student.previous_rank, Some(2));
        assert_eq!(filiere.student.rank_delta, Some(0));
        assert_eq!(filiere.student.average_delta, Some(4.0));
        assert_eq!(filiere.group_average.previous, Some(11.0));
        assert_eq!(filiere.group_average.delta, Some(4.0));
    }

    #[tokio::test]
    async fn test_baseline_uses_earlier_grouping() {
        // The student changed groupe between semesters.
        let s4 = Period::new(year(), s(4));
        let engine = engine(vec![
            record("A", "G2", Some(15.0)),
            record("C", "G2", Some(20.0)),
            record_in(s4, "A", "G1", Some(14.0)),
            record_in(s4, "B", "G1", Some(10.0)),
            record_in(s4, "C", "G2", Some(9.0)),
        ]);

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        let spe = result.spe.as_ref().unwrap();

        assert_eq!(spe.student.rank, 2);
        assert_eq!(spe.student.previous_rank, Some(1));
        assert_eq!(spe.group_average.previous, Some(12.0));
    }

    #[tokio::test]
    async fn test_no_prior_data_leaves_deltas_absent() {
        let engine = engine(reference_population());
        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();

        for level in GroupingLevel::ALL {
            let stats = result.level(level).unwrap();
            assert!(stats.student.rank_delta.is_none());
            assert!(stats.student.average_delta.is_none());
            assert!(stats.group_average.delta.is_none());
        }
    }

    #[tokio::test]
    async fn test_prior_semester_rule() {
        let s2 = Period::new(year().previous(), s(2));
        let s4_last_year = Period::new(year().previous(), s(4));
        let s3 = Period::new(year(), s(3));
        let engine = engine_with(
            vec![
                record_in(s3, "A", "G1", Some(15.0)),
                record_in(s2, "A", "G1", Some(10.0)),
                record_in(s4_last_year, "A", "G1", Some(12.0)),
            ],
            StatisticsConfig {
                previous_period: PreviousPeriodRule::PriorSemester,
                ..StatisticsConfig::default()
            },
        );

        let result = engine.compute_statistics("A", s(3), year()).await.unwrap();
        assert_eq!(result.previous_period, Some(s2));
        assert_eq!(result.spe.unwrap().student.average_delta, Some(5.0));
    }

    #[tokio::test]
    async fn test_prior_year_rule_without_record() {
        let s4 = Period::new(year(), s(4));
        let engine = engine_with(
            vec![record("A", "G1", Some(15.0)), record_in(s4, "A", "G1", Some(12.0))],
            StatisticsConfig {
                previous_period: PreviousPeriodRule::PriorYear,
                ..StatisticsConfig::default()
            },
        );

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        assert!(result.previous_period.is_none());
        assert!(result.spe.unwrap().student.rank_delta.is_none());
    }

    #[tokio::test]
    async fn test_single_student_population() {
        let engine = engine(vec![record("solo", "G1", Some(13.5))]);
        let result = engine.compute_statistics("solo", s(5), year()).await.unwrap();

        for level in GroupingLevel::ALL {
            let stats = result.level(level).unwrap();
            assert_eq!(stats.student.rank, 1);
            assert_eq!(stats.group_average.current, 13.5);
            assert_eq!(stats.summary.min, stats.summary.max);
        }
    }

    #[tokio::test]
    async fn test_leaderboard_truncation() {
        let records: Vec<_> = (0..15)
            .map(|i| record(&format!("s{i:02}"), "G1", Some(i as f64)))
            .collect();
        let engine = engine(records);

        let result = engine.compute_statistics("s00", s(5), year()).await.unwrap();
        let spe = result.spe.as_ref().unwrap();

        assert_eq!(spe.student_ranking.len(), 10);
        assert_eq!(spe.ranked_count, 15);
        assert_eq!(spe.student.rank, 15);
    }

    #[tokio::test]
    async fn test_display_names_follow_opt_in() {
        let store = MemoryStore::new(reference_population()).with_identities(vec![
            StudentIdentity::new("C").with_names("Ada", "Lovelace").opted_in(),
            StudentIdentity::new("A").with_names("Alan", "Turing"),
        ]);
        let engine = StatisticsEngine::new(Arc::new(store), StatisticsConfig::default());

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        let names: Vec<_> = result
            .filiere
            .unwrap()
            .student_ranking
            .iter()
            .map(|e| e.display_name.clone())
            .collect();
        assert_eq!(names, vec!["Ada Lovelace", "Anonymous", "Anonymous"]);
    }

    #[tokio::test]
    async fn test_subject_statistics_in_levels() {
        let engine = engine(vec![
            record("A", "G1", Some(15.0))
                .with_subjects(vec![Subject::new("SM102PM", "Maths", Some(14.0))]),
            record("B", "G2", Some(10.0))
                .with_subjects(vec![Subject::new("SM102I", "Maths", Some(16.0))]),
        ]);

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        let subjects = &result.filiere.as_ref().unwrap().subjects;

        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].code, "SM102");
        assert_eq!(subjects[0].student.unwrap().rank, 2);
    }

    #[tokio::test]
    async fn test_student_periods() {
        let s4 = Period::new(year(), s(4));
        let mut records = reference_population();
        records.push(record_in(s4, "A", "G1", Some(11.0)));
        records.push(record_in(s4, "A", "G1", Some(11.0)));
        let engine = engine(records);

        let periods = engine.student_periods("A").await.unwrap();
        assert_eq!(periods, vec![s4, period()]);

        assert!(engine.student_periods("nobody").await.unwrap().is_empty());
    }

    struct FailingStore;

    #[async_trait]
    impl RecordStore for FailingStore {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn find_records(
            &self,
            _filter: &RecordFilter,
        ) -> Result<Vec<SemesterRecord>, StorageError> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn find_identities(
            &self,
            _user_ids: &[String],
        ) -> Result<Vec<StudentIdentity>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_storage_failure_fails_request() {
        let engine = StatisticsEngine::new(Arc::new(FailingStore), StatisticsConfig::default());

        let err = engine.compute_statistics("A", s(5), year()).await.unwrap_err();
        assert!(matches!(err, StatsError::Storage(_)));
        assert_eq!(engine.store_name(), "failing");
    }

    /// Serves the target's history, then fails population reads.
    struct FlakyPopulationStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl RecordStore for FlakyPopulationStore {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn find_records(
            &self,
            filter: &RecordFilter,
        ) -> Result<Vec<SemesterRecord>, StorageError> {
            if filter.user_id.is_some() {
                return self.inner.find_records(filter).await;
            }
            Err(StorageError::Unavailable("timeout".to_string()))
        }

        async fn find_identities(
            &self,
            user_ids: &[String],
        ) -> Result<Vec<StudentIdentity>, StorageError> {
            self.inner.find_identities(user_ids).await
        }
    }

    #[tokio::test]
    async fn test_population_read_failure_fails_request() {
        let store = FlakyPopulationStore {
            inner: MemoryStore::new(reference_population()),
        };
        let engine = StatisticsEngine::new(Arc::new(store), StatisticsConfig::default());

        let err = engine.compute_statistics("A", s(5), year()).await.unwrap_err();
        assert!(matches!(err, StatsError::Storage(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_subject_leaderboard_names_students_without_overall_average() {
        let store = MemoryStore::new(vec![
            record("A", "G1", Some(15.0))
                .with_subjects(vec![Subject::new("SM102", "Maths", Some(12.0))]),
            record("B", "G1", None).with_subjects(vec![Subject::new("SM102", "Maths", Some(18.0))]),
        ])
        .with_identities(vec![StudentIdentity::new("B")
            .with_names("Ada", "Lovelace")
            .opted_in()]);
        let engine = StatisticsEngine::new(Arc::new(store), StatisticsConfig::default());

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();
        let maths = &result.spe.as_ref().unwrap().subjects[0];

        assert_eq!(maths.student_ranking[0].user_id, "B");
        assert_eq!(maths.student_ranking[0].display_name, "Ada Lovelace");
        assert_eq!(maths.student.unwrap().rank, 2);
    }

    /// Hides the target student from cursus-wide reads.
    struct MissingFromCursusStore {
        inner: MemoryStore,
        target: &'static str,
    }

    #[async_trait]
    impl RecordStore for MissingFromCursusStore {
        fn name(&self) -> &'static str {
            "missing-from-cursus"
        }

        async fn find_records(
            &self,
            filter: &RecordFilter,
        ) -> Result<Vec<SemesterRecord>, StorageError> {
            let mut records = self.inner.find_records(filter).await?;
            if filter.cursus.is_some() {
                records.retain(|r| r.user_id != self.target);
            }
            Ok(records)
        }

        async fn find_identities(
            &self,
            user_ids: &[String],
        ) -> Result<Vec<StudentIdentity>, StorageError> {
            self.inner.find_identities(user_ids).await
        }
    }

    #[tokio::test]
    async fn test_level_failure_is_isolated() {
        let store = MissingFromCursusStore {
            inner: MemoryStore::new(reference_population()),
            target: "A",
        };
        let engine = StatisticsEngine::new(Arc::new(store), StatisticsConfig::default());

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].level, GroupingLevel::Cursus);
        assert!(result.failures[0].message.contains("cursus"));
        assert!(result.cursus.is_none());
        assert!(result.branch.is_some());
        assert!(result.spe.is_some());
        assert!(result.filiere.is_some());
    }

    /// Panics on cursus-wide reads.
    struct PanickingCursusStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl RecordStore for PanickingCursusStore {
        fn name(&self) -> &'static str {
            "panicking-cursus"
        }

        async fn find_records(
            &self,
            filter: &RecordFilter,
        ) -> Result<Vec<SemesterRecord>, StorageError> {
            if filter.cursus.is_some() {
                panic!("cursus read exploded");
            }
            self.inner.find_records(filter).await
        }

        async fn find_identities(
            &self,
            user_ids: &[String],
        ) -> Result<Vec<StudentIdentity>, StorageError> {
            self.inner.find_identities(user_ids).await
        }
    }

    #[tokio::test]
    async fn test_panicking_level_task_is_isolated() {
        let store = PanickingCursusStore {
            inner: MemoryStore::new(reference_population()),
        };
        let engine = StatisticsEngine::new(Arc::new(store), StatisticsConfig::default());

        let result = engine.compute_statistics("A", s(5), year()).await.unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].level, GroupingLevel::Cursus);
        assert!(result.failures[0].message.starts_with("Level task aborted"));
        assert!(result.cursus.is_none());
        assert_eq!(result.filiere.as_ref().unwrap().student.rank, 2);
    }
}
