//! Per-subject and per-module statistics.
//!
//! Subject and module codes are normalized before bucketing, so sections of
//! the same course taught to different groups are compared together.

use std::collections::BTreeMap;

use crate::calculate::rank::Candidate;
use crate::calculate::{self, module_key, normalize_subject_code, AggregateError};
use crate::models::{ModuleKey, ModuleStats, SemesterRecord, SubjectStats};

use super::RankingContext;

/// Students who took one subject or module, with the first name seen for it.
#[derive(Debug, Default)]
struct Bucket {
    name: Option<String>,
    candidates: Vec<Candidate>,
}

impl Bucket {
    fn add(&mut self, name: &str, record: &SemesterRecord, average: Option<f64>) {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        if average.is_some() {
            self.candidates.push(Candidate::from_record(record, average));
        }
    }
}

/// Build statistics for every subject (and its modules) found in `population`.
///
/// Codes without a single graded entry are skipped. Output is ordered by
/// normalized code.
pub fn build_subject_stats(
    population: &[SemesterRecord],
    ctx: &RankingContext<'_>,
) -> Result<Vec<SubjectStats>, AggregateError> {
    let mut subjects: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut modules: BTreeMap<ModuleKey, Bucket> = BTreeMap::new();

    for record in population {
        for subject in &record.subjects {
            subjects
                .entry(normalize_subject_code(&subject.code))
                .or_default()
                .add(&subject.name, record, subject.average);

            for module in &subject.modules {
                modules
                    .entry(module_key(&subject.code, &module.code))
                    .or_default()
                    .add(&module.name, record, module.average);
            }
        }
    }

    let mut stats = Vec::new();
    for (code, bucket) in subjects {
        if bucket.candidates.is_empty() {
            continue;
        }

        let module_stats = modules
            .iter()
            .filter(|(key, _)| key.subject == code)
            .filter(|(_, bucket)| !bucket.candidates.is_empty())
            .map(|(key, bucket)| build_module_stats(key, bucket, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let averages = averages_of(&bucket.candidates);
        let ranking = ctx.rank(&bucket.candidates);
        let group_ranking = calculate::rank_groups_from_entries(&ranking);

        stats.push(SubjectStats {
            name: bucket.name.unwrap_or_else(|| code.clone()),
            code,
            summary: calculate::summarize(&averages)?,
            student: ctx.standing_of(&ranking),
            student_ranking: ctx.top(ranking),
            group_ranking: ctx.top(group_ranking),
            modules: module_stats,
        });
    }

    Ok(stats)
}

fn build_module_stats(
    key: &ModuleKey,
    bucket: &Bucket,
    ctx: &RankingContext<'_>,
) -> Result<ModuleStats, AggregateError> {
    let averages = averages_of(&bucket.candidates);
    let ranking = ctx.rank(&bucket.candidates);
    let group_ranking = calculate::rank_groups_from_entries(&ranking);

    Ok(ModuleStats {
        code: key.module.clone(),
        name: bucket.name.clone().unwrap_or_else(|| key.module.clone()),
        summary: calculate::summarize(&averages)?,
        student: ctx.standing_of(&ranking),
        student_ranking: ctx.top(ranking),
        group_ranking: ctx.top(group_ranking),
    })
}

fn averages_of(candidates: &[Candidate]) -> Vec<f64> {
    candidates.iter().filter_map(|c| c.average).collect()
}
