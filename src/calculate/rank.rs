//! Student and group rankings.
//!
//! Rankings are ordered by average, descending, and numbered 1..N without
//! gaps. Equal averages are not collapsed: ties are broken by user id (for
//! students) or group key (for groups) so that the same input always yields
//! the same ranking.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::{GroupKey, GroupRankEntry, RankEntry, SemesterRecord, StudentIdentity};

/// How students are bucketed for group rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupScheme {
    /// (groupe, branch), with groupe standing in for a missing branch
    #[default]
    ByEffectiveGroup,
    /// (groupe, filiere), for cursus-wide views
    ByFiliere,
}

impl GroupScheme {
    pub fn key(&self, record: &SemesterRecord) -> GroupKey {
        match self {
            GroupScheme::ByEffectiveGroup => {
                GroupKey::new(record.groupe.clone(), record.effective_group())
            }
            GroupScheme::ByFiliere => GroupKey::new(record.groupe.clone(), record.effective_filiere()),
        }
    }
}

/// A student waiting to be ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub user_id: String,
    pub average: Option<f64>,
    pub spe: String,
    /// Effective group (branch, else groupe)
    pub group: String,
}

impl Candidate {
    pub fn new(
        user_id: impl Into<String>,
        average: Option<f64>,
        spe: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            average,
            spe: spe.into(),
            group: group.into(),
        }
    }

    /// A candidate carrying the record's own grouping and the given average.
    pub fn from_record(record: &SemesterRecord, average: Option<f64>) -> Self {
        Self::new(
            record.user_id.clone(),
            average,
            record.groupe.clone(),
            record.effective_group(),
        )
    }
}

/// Resolve the name shown for a student on leaderboards.
///
/// Real names are only shown to students that opted in; everyone else, and
/// anyone without an identity record, gets `anonymous_name`.
pub fn resolve_display_name(identity: Option<&StudentIdentity>, anonymous_name: &str) -> String {
    let Some(identity) = identity.filter(|i| i.show_real_name) else {
        return anonymous_name.to_string();
    };

    let first = non_blank(identity.first_name.as_deref());
    let last = non_blank(identity.last_name.as_deref());

    if let (Some(first), Some(last)) = (first, last) {
        return format!("{first} {last}");
    }

    non_blank(identity.display_name.as_deref())
        .or(first)
        .or(last)
        .unwrap_or(anonymous_name)
        .to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Rank students by average. Candidates without an average are dropped.
pub fn rank_students(
    candidates: &[Candidate],
    identities: &HashMap<String, StudentIdentity>,
    anonymous_name: &str,
) -> Vec<RankEntry> {
    let mut graded: Vec<(&Candidate, f64)> = candidates
        .iter()
        .filter_map(|c| c.average.map(|avg| (c, avg)))
        .collect();

    graded.sort_by(|(a, a_avg), (b, b_avg)| {
        by_average_desc(*a_avg, *b_avg).then_with(|| a.user_id.cmp(&b.user_id))
    });

    graded
        .into_iter()
        .enumerate()
        .map(|(idx, (candidate, average))| RankEntry {
            user_id: candidate.user_id.clone(),
            display_name: resolve_display_name(
                identities.get(&candidate.user_id),
                anonymous_name,
            ),
            spe: candidate.spe.clone(),
            group: candidate.group.clone(),
            average,
            rank: idx as u32 + 1,
        })
        .collect()
}

/// Rank group buckets built from raw records.
///
/// Each bucket's average is taken over the members that have an overall
/// average; ungraded members count towards neither side of the division.
pub fn rank_groups(records: &[SemesterRecord], scheme: GroupScheme) -> Vec<GroupRankEntry> {
    rank_buckets(records.iter().map(|r| (scheme.key(r), r.average)))
}

/// Rank group buckets built from an existing student ranking.
pub fn rank_groups_from_entries(entries: &[RankEntry]) -> Vec<GroupRankEntry> {
    rank_buckets(
        entries
            .iter()
            .map(|e| (GroupKey::new(e.spe.clone(), e.group.clone()), Some(e.average))),
    )
}

fn rank_buckets(members: impl Iterator<Item = (GroupKey, Option<f64>)>) -> Vec<GroupRankEntry> {
    let mut buckets: BTreeMap<GroupKey, (f64, u32)> = BTreeMap::new();
    for (key, average) in members {
        let Some(average) = average else {
            continue;
        };
        let bucket = buckets.entry(key).or_insert((0.0, 0));
        bucket.0 += average;
        bucket.1 += 1;
    }

    let mut groups: Vec<(GroupKey, f64, u32)> = buckets
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64, count))
        .collect();

    groups.sort_by(|a, b| by_average_desc(a.1, b.1).then_with(|| a.0.cmp(&b.0)));

    groups
        .into_iter()
        .enumerate()
        .map(|(idx, (key, average, member_count))| GroupRankEntry {
            spe: key.spe,
            group: key.group,
            average,
            member_count,
            rank: idx as u32 + 1,
        })
        .collect()
}

fn by_average_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicYear, Period, Semester};

    fn period() -> Period {
        Period::new(AcademicYear::new(2025), Semester::new(5).unwrap())
    }

    fn record(user: &str, groupe: &str, average: Option<f64>) -> SemesterRecord {
        let mut r = SemesterRecord::new(user, period(), "ING", "INFO", groupe);
        r.average = average;
        r
    }

    fn no_identities() -> HashMap<String, StudentIdentity> {
        HashMap::new()
    }

    #[test]
    fn test_reference_population_ranking() {
        let records = vec![
            record("A", "G1", Some(15.0)),
            record("B", "G1", Some(10.0)),
            record("C", "G2", Some(20.0)),
        ];
        let candidates: Vec<_> = records
            .iter()
            .map(|r| Candidate::from_record(r, r.average))
            .collect();

        let students = rank_students(&candidates, &no_identities(), "Anonymous");
        let order: Vec<_> = students
            .iter()
            .map(|e| (e.user_id.as_str(), e.rank, e.average))
            .collect();
        assert_eq!(order, vec![("C", 1, 20.0), ("A", 2, 15.0), ("B", 3, 10.0)]);

        let groups = rank_groups(&records, GroupScheme::ByEffectiveGroup);
        let order: Vec<_> = groups
            .iter()
            .map(|g| (g.group.as_str(), g.rank, g.average))
            .collect();
        assert_eq!(order, vec![("G2", 1, 20.0), ("G1", 2, 12.5)]);
    }

    #[test]
    fn test_absent_averages_are_not_ranked() {
        let candidates = vec![
            Candidate::new("a", Some(12.0), "G1", "G1"),
            Candidate::new("b", None, "G1", "G1"),
            Candidate::new("c", Some(8.0), "G1", "G1"),
            Candidate::new("d", None, "G1", "G1"),
        ];

        let ranked = rank_students(&candidates, &no_identities(), "Anonymous");
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|e| e.user_id != "b" && e.user_id != "d"));
        let ranks: Vec<u32> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_ties_get_sequential_ranks_by_user_id() {
        let candidates = vec![
            Candidate::new("zoe", Some(14.0), "G1", "G1"),
            Candidate::new("amir", Some(14.0), "G1", "G1"),
            Candidate::new("li", Some(16.0), "G1", "G1"),
        ];

        let ranked = rank_students(&candidates, &no_identities(), "Anonymous");
        let order: Vec<_> = ranked.iter().map(|e| (e.user_id.as_str(), e.rank)).collect();
        assert_eq!(order, vec![("li", 1), ("amir", 2), ("zoe", 3)]);
    }

    #[test]
    fn test_group_average_ignores_ungraded_members() {
        let records = vec![
            record("a", "G1", Some(10.0)),
            record("b", "G1", None),
            record("c", "G1", Some(14.0)),
        ];

        let groups = rank_groups(&records, GroupScheme::ByEffectiveGroup);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].average, 12.0);
        assert_eq!(groups[0].member_count, 2);
    }

    #[test]
    fn test_group_with_no_graded_members_is_dropped() {
        let records = vec![record("a", "G1", None), record("b", "G2", Some(9.0))];

        let groups = rank_groups(&records, GroupScheme::ByEffectiveGroup);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group, "G2");
    }

    #[test]
    fn test_branch_fallback_uses_groupe_as_group() {
        let records = vec![
            record("a", "B", Some(10.0)).with_branch("B2"),
            record("b", "B2", Some(14.0)).with_branch(""),
            record("c", "B2", Some(12.0)),
        ];

        let groups = rank_groups(&records, GroupScheme::ByEffectiveGroup);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.group == "B2"));
        assert_eq!(groups[0].key(), GroupKey::new("B2", "B2"));
        assert_eq!(groups[0].average, 13.0);
    }

    #[test]
    fn test_cursus_scheme_buckets_by_filiere() {
        let mut a = record("a", "G1", Some(10.0));
        a.filiere = "INFO".to_string();
        let mut b = record("b", "G1", Some(14.0));
        b.filiere = "MECA".to_string();

        let groups = rank_groups(&[a, b], GroupScheme::ByFiliere);
        let order: Vec<_> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(order, vec!["MECA", "INFO"]);
    }

    #[test]
    fn test_groups_from_entries_matches_records() {
        let records = vec![
            record("A", "G1", Some(15.0)),
            record("B", "G1", Some(10.0)),
            record("C", "G2", Some(20.0)),
            record("D", "G2", None),
        ];
        let candidates: Vec<_> = records
            .iter()
            .map(|r| Candidate::from_record(r, r.average))
            .collect();
        let students = rank_students(&candidates, &no_identities(), "Anonymous");

        assert_eq!(
            rank_groups_from_entries(&students),
            rank_groups(&records, GroupScheme::ByEffectiveGroup)
        );
    }

    #[test]
    fn test_single_student_population() {
        let records = vec![record("solo", "G1", Some(11.5))];
        let candidates = vec![Candidate::from_record(&records[0], Some(11.5))];

        let students = rank_students(&candidates, &no_identities(), "Anonymous");
        assert_eq!(students[0].rank, 1);

        let groups = rank_groups(&records, GroupScheme::ByEffectiveGroup);
        assert_eq!(groups[0].average, 11.5);
        assert_eq!(groups[0].rank, 1);
    }

    #[test]
    fn test_display_name_requires_opt_in() {
        let identity = StudentIdentity::new("u1").with_names("Ada", "Lovelace");
        assert_eq!(resolve_display_name(Some(&identity), "Anonymous"), "Anonymous");
        assert_eq!(resolve_display_name(None, "Anonymous"), "Anonymous");
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let full = StudentIdentity::new("u1")
            .with_names("Ada", "Lovelace")
            .with_display_name("ada_l")
            .opted_in();
        assert_eq!(resolve_display_name(Some(&full), "Anonymous"), "Ada Lovelace");

        let mut display_only = full.clone();
        display_only.last_name = None;
        assert_eq!(resolve_display_name(Some(&display_only), "Anonymous"), "ada_l");

        display_only.display_name = Some("  ".to_string());
        assert_eq!(resolve_display_name(Some(&display_only), "Anonymous"), "Ada");

        let last_only = StudentIdentity {
            first_name: None,
            last_name: Some("Lovelace".to_string()),
            ..StudentIdentity::new("u1").opted_in()
        };
        assert_eq!(resolve_display_name(Some(&last_only), "Anonymous"), "Lovelace");

        let nothing = StudentIdentity::new("u1").opted_in();
        assert_eq!(resolve_display_name(Some(&nothing), "Anonymous"), "Anonymous");
    }

    #[test]
    fn test_rank_entries_carry_display_names() {
        let mut identities = HashMap::new();
        identities.insert(
            "a".to_string(),
            StudentIdentity::new("a").with_names("Ada", "Lovelace").opted_in(),
        );
        identities.insert(
            "b".to_string(),
            StudentIdentity::new("b").with_names("Alan", "Turing"),
        );
        let candidates = vec![
            Candidate::new("a", Some(18.0), "B", "B2"),
            Candidate::new("b", Some(17.0), "B", "B1"),
        ];

        let ranked = rank_students(&candidates, &identities, "Anonymous");
        assert_eq!(ranked[0].label(), "Ada Lovelace/-/B2");
        assert_eq!(ranked[1].label(), "Anonymous/-/B1");
    }
}
