//! Academic periods: academic years, semesters, and their ordering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Month (1-based) in which a new academic year starts.
const ACADEMIC_YEAR_START_MONTH: u32 = 9;

/// Errors raised when parsing period components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Invalid academic year: {0:?} (expected e.g. \"2025-2026\")")]
    InvalidAcademicYear(String),

    #[error("Invalid semester: {0:?} (expected e.g. \"S5\")")]
    InvalidSemester(String),
}

/// An academic year such as `2025-2026`, identified by its start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear {
    start: i32,
}

impl AcademicYear {
    pub fn new(start: i32) -> Self {
        Self { start }
    }

    /// The academic year a calendar date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= ACADEMIC_YEAR_START_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn previous(&self) -> Self {
        Self::new(self.start - 1)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, i64::from(self.start) + 1)
    }
}

impl FromStr for AcademicYear {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PeriodError::InvalidAcademicYear(s.to_string());

        let (first, second) = match trimmed.split_once(['-', '/']) {
            Some((a, b)) => (a.trim(), Some(b.trim())),
            None => (trimmed, None),
        };

        let start: i32 = first.parse().map_err(|_| invalid())?;
        let next = start.checked_add(1).ok_or_else(invalid)?;
        if let Some(end) = second {
            let end: i32 = end.parse().map_err(|_| invalid())?;
            if end != next {
                return Err(invalid());
            }
        }

        Ok(Self::new(start))
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.to_string()
    }
}

/// A semester number (`S1`, `S2`, ...) within a curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Semester(u8);

impl Semester {
    /// Create a semester, rejecting `S0`.
    pub fn new(number: u8) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Odd semesters open an academic year.
    pub fn opens_year(&self) -> bool {
        self.0 % 2 == 1
    }

    pub fn previous(&self) -> Option<Self> {
        Self::new(self.0 - 1)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl FromStr for Semester {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('S')
            .or_else(|| trimmed.strip_prefix('s'))
            .unwrap_or(trimmed);

        digits
            .parse::<u8>()
            .ok()
            .and_then(Semester::new)
            .ok_or_else(|| PeriodError::InvalidSemester(s.to_string()))
    }
}

impl TryFrom<String> for Semester {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Semester> for String {
    fn from(semester: Semester) -> Self {
        semester.to_string()
    }
}

/// One (academic year, semester) pair. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub academic_year: AcademicYear,
    pub semester: Semester,
}

impl Period {
    pub fn new(academic_year: AcademicYear, semester: Semester) -> Self {
        Self {
            academic_year,
            semester,
        }
    }

    /// The semester before this one in the curriculum.
    ///
    /// Odd semesters open an academic year, so `S3` of 2025-2026 is preceded
    /// by `S2` of 2024-2025 while `S4` is preceded by `S3` of the same year.
    pub fn prior_semester(&self) -> Option<Self> {
        let semester = self.semester.previous()?;
        let academic_year = if self.semester.opens_year() {
            self.academic_year.previous()
        } else {
            self.academic_year
        };
        Some(Self::new(academic_year, semester))
    }

    /// The same semester one academic year earlier.
    pub fn prior_year(&self) -> Self {
        Self::new(self.academic_year.previous(), self.semester)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.academic_year, self.semester)
    }
}
