//! Ranking and statistics result models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Period;

/// Separator used when a composite key has to be flattened into one string
/// for presentation. Not expected to occur in codes or group names.
pub const KEY_SEPARATOR: &str = "/-/";

/// The four nested grouping levels a student is compared within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingLevel {
    /// Effective group: branch, or groupe when no branch is set
    Branch,
    /// Class cohort (groupe)
    Spe,
    Filiere,
    Cursus,
}

impl GroupingLevel {
    pub const ALL: [GroupingLevel; 4] = [
        GroupingLevel::Branch,
        GroupingLevel::Spe,
        GroupingLevel::Filiere,
        GroupingLevel::Cursus,
    ];
}

impl fmt::Display for GroupingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingLevel::Branch => write!(f, "branch"),
            GroupingLevel::Spe => write!(f, "spe"),
            GroupingLevel::Filiere => write!(f, "filiere"),
            GroupingLevel::Cursus => write!(f, "cursus"),
        }
    }
}

/// Bucket key for group rankings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub spe: String,
    pub group: String,
}

impl GroupKey {
    pub fn new(spe: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            spe: spe.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.spe, KEY_SEPARATOR, self.group)
    }
}

/// Map key for a module: normalized parent subject code + normalized module code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleKey {
    pub subject: String,
    pub module: String,
}

impl ModuleKey {
    pub fn new(subject: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            module: module.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.subject, KEY_SEPARATOR, self.module)
    }
}

/// One student in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub user_id: String,

    /// Real name or placeholder, depending on the student's opt-in
    pub display_name: String,

    /// Class cohort (groupe) of the student
    pub spe: String,

    /// Effective group of the student
    pub group: String,

    pub average: f64,

    /// 1-based, contiguous within one ranking
    pub rank: u32,
}

impl RankEntry {
    /// Presentation label, `name/-/group`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.display_name, KEY_SEPARATOR, self.group)
    }
}

/// One group bucket in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRankEntry {
    pub spe: String,
    pub group: String,

    /// Mean over members that have an average
    pub average: f64,

    /// Members that contributed to the average
    pub member_count: u32,

    pub rank: u32,
}

impl GroupRankEntry {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.spe.clone(), self.group.clone())
    }
}

/// Descriptive statistics over a non-empty sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: u32,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// A value for the requested period alongside its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub current: f64,
    pub previous: Option<f64>,
    /// current - previous
    pub delta: Option<f64>,
}

impl Trend {
    pub fn new(current: f64, previous: Option<f64>) -> Self {
        Self {
            current,
            previous,
            delta: previous.map(|p| current - p),
        }
    }
}

/// Where the target student stands within one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentPosition {
    pub rank: u32,
    pub average: f64,
    pub previous_rank: Option<u32>,
    pub previous_average: Option<f64>,
    /// current rank - previous rank (negative means the student moved up)
    pub rank_delta: Option<i64>,
    /// current average - previous average
    pub average_delta: Option<f64>,
}

impl StudentPosition {
    pub fn new(current: Standing, previous: Option<Standing>) -> Self {
        Self {
            rank: current.rank,
            average: current.average,
            previous_rank: previous.map(|p| p.rank),
            previous_average: previous.map(|p| p.average),
            rank_delta: previous.map(|p| i64::from(current.rank) - i64::from(p.rank)),
            average_delta: previous.map(|p| current.average - p.average),
        }
    }
}

/// A rank and average pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub average: f64,
}

/// Statistics for one module code across a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    /// Normalized module code
    pub code: String,
    pub name: String,
    pub summary: Summary,
    /// The target student's standing, if they took the module
    pub student: Option<Standing>,
    pub student_ranking: Vec<RankEntry>,
    pub group_ranking: Vec<GroupRankEntry>,
}

/// Statistics for one subject code across a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStats {
    /// Normalized subject code
    pub code: String,
    pub name: String,
    pub summary: Summary,
    pub student: Option<Standing>,
    pub student_ranking: Vec<RankEntry>,
    pub group_ranking: Vec<GroupRankEntry>,
    pub modules: Vec<ModuleStats>,
}

/// Statistics for one grouping level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: GroupingLevel,

    /// Display name of the group (branch, groupe, filiere or cursus)
    pub name: String,

    /// Records in the population, graded or not
    pub member_count: u32,

    /// Records with an overall average
    pub ranked_count: u32,

    pub student: StudentPosition,

    pub group_average: Trend,

    pub summary: Summary,

    pub student_ranking: Vec<RankEntry>,

    pub group_ranking: Vec<GroupRankEntry>,

    pub subjects: Vec<SubjectStats>,
}

/// A grouping level whose computation aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFailure {
    pub level: GroupingLevel,
    pub message: String,
}

/// The complete response for one student and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub user_id: String,
    pub period: Period,
    pub previous_period: Option<Period>,
    pub branch: Option<LevelStats>,
    pub spe: Option<LevelStats>,
    pub filiere: Option<LevelStats>,
    pub cursus: Option<LevelStats>,
    #[serde(default)]
    pub failures: Vec<LevelFailure>,
}

impl StatisticsResult {
    pub fn new(user_id: impl Into<String>, period: Period) -> Self {
        Self {
            user_id: user_id.into(),
            period,
            previous_period: None,
            branch: None,
            spe: None,
            filiere: None,
            cursus: None,
            failures: Vec::new(),
        }
    }

    /// Get the statistics block for a level.
    pub fn level(&self, level: GroupingLevel) -> Option<&LevelStats> {
        match level {
            GroupingLevel::Branch => self.branch.as_ref(),
            GroupingLevel::Spe => self.spe.as_ref(),
            GroupingLevel::Filiere => self.filiere.as_ref(),
            GroupingLevel::Cursus => self.cursus.as_ref(),
        }
    }

    /// Store the statistics block for a level.
    pub fn set_level(&mut self, level: GroupingLevel, stats: Option<LevelStats>) {
        match level {
            GroupingLevel::Branch => self.branch = stats,
            GroupingLevel::Spe => self.spe = stats,
            GroupingLevel::Filiere => self.filiere = stats,
            GroupingLevel::Cursus => self.cursus = stats,
        }
    }
}
