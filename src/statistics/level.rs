//! Statistics for one grouping level.

use thiserror::Error;

use crate::calculate::rank::{Candidate, GroupScheme};
use crate::calculate::{self, AggregateError};
use crate::models::{GroupingLevel, LevelStats, SemesterRecord, Standing, StudentPosition, Trend};
use crate::storage::RecordFilter;

use super::subjects::build_subject_stats;
use super::RankingContext;

/// Errors that abort a single level's computation.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Aggregate error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Student {0} missing from their own {1} ranking")]
    StudentNotRanked(String, GroupingLevel),
}

/// Which records make up a level's population, as seen from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelScope {
    pub level: GroupingLevel,
    /// Display name of the group
    pub name: String,
    /// Store-side filter; may over-select
    pub filter: RecordFilter,
    pub scheme: GroupScheme,
}

impl LevelScope {
    /// The scope of `level` around `record`, in the record's own period.
    pub fn around(level: GroupingLevel, record: &SemesterRecord) -> Self {
        let by_period = RecordFilter::for_period(record.period());

        match level {
            GroupingLevel::Branch => {
                let group = record.effective_group().to_string();
                Self {
                    level,
                    filter: by_period.with_branch_in(vec![group.clone(), String::new()]),
                    name: group,
                    scheme: GroupScheme::ByEffectiveGroup,
                }
            }
            GroupingLevel::Spe => Self {
                level,
                name: record.groupe.clone(),
                filter: by_period.with_groupe(record.groupe.clone()),
                scheme: GroupScheme::ByEffectiveGroup,
            },
            GroupingLevel::Filiere => Self {
                level,
                name: record.filiere.clone(),
                filter: by_period.with_filiere(record.filiere.clone()),
                scheme: GroupScheme::ByEffectiveGroup,
            },
            GroupingLevel::Cursus => Self {
                level,
                name: record.cursus.clone(),
                filter: by_period.with_cursus(record.cursus.clone()),
                scheme: GroupScheme::ByFiliere,
            },
        }
    }

    /// Whether a record fetched with `filter` belongs to the population.
    ///
    /// The branch filter admits every record without a branch, so the
    /// effective group has to be checked here.
    pub fn admits(&self, record: &SemesterRecord) -> bool {
        match self.level {
            GroupingLevel::Branch => record.effective_group() == self.name,
            _ => true,
        }
    }

    /// Keep the admitted records, ordered by user id.
    pub fn population(&self, mut records: Vec<SemesterRecord>) -> Vec<SemesterRecord> {
        records.retain(|r| self.admits(r));
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        records
    }
}

/// Compute one level's block.
///
/// `current` and `previous` must already be scoped populations. Returns
/// `Ok(None)` when nobody in `current` has an average.
pub fn compute_level(
    scope: &LevelScope,
    current: &[SemesterRecord],
    previous: &[SemesterRecord],
    ctx: &RankingContext<'_>,
) -> Result<Option<LevelStats>, LevelError> {
    let candidates: Vec<Candidate> = current
        .iter()
        .map(|r| Candidate::from_record(r, r.average))
        .collect();
    let ranking = ctx.rank(&candidates);

    if ranking.is_empty() {
        return Ok(None);
    }

    let averages: Vec<f64> = ranking.iter().map(|e| e.average).collect();
    let summary = calculate::summarize(&averages)?;

    let standing = ctx
        .standing_of(&ranking)
        .ok_or_else(|| LevelError::StudentNotRanked(ctx.user_id.to_string(), scope.level))?;

    let (previous_standing, previous_mean) = baseline(previous, ctx)?;

    let group_ranking = calculate::rank_groups(current, scope.scheme);
    let subjects = build_subject_stats(current, ctx)?;

    Ok(Some(LevelStats {
        level: scope.level,
        name: scope.name.clone(),
        member_count: current.len() as u32,
        ranked_count: ranking.len() as u32,
        student: StudentPosition::new(standing, previous_standing),
        group_average: Trend::new(summary.mean, previous_mean),
        summary,
        student_ranking: ctx.top(ranking),
        group_ranking: ctx.top(group_ranking),
        subjects,
    }))
}

/// The student's standing and the group mean in the baseline population.
fn baseline(
    previous: &[SemesterRecord],
    ctx: &RankingContext<'_>,
) -> Result<(Option<Standing>, Option<f64>), AggregateError> {
    let candidates: Vec<Candidate> = previous
        .iter()
        .map(|r| Candidate::from_record(r, r.average))
        .collect();
    let ranking = ctx.rank(&candidates);

    if ranking.is_empty() {
        return Ok((None, None));
    }

    let averages: Vec<f64> = ranking.iter().map(|e| e.average).collect();
    Ok((ctx.standing_of(&ranking), Some(calculate::mean(&averages)?)))
}
