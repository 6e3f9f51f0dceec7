//! Semester grade records as held by the record store.

use serde::{Deserialize, Serialize};

use super::{AcademicYear, Period, Semester};

/// A graded sub-component of a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Raw code, possibly carrying a group suffix (e.g. "M1PM")
    pub code: String,

    pub name: String,

    /// None until the module has graded items
    #[serde(default)]
    pub average: Option<f64>,
}

impl Module {
    pub fn new(code: impl Into<String>, name: impl Into<String>, average: Option<f64>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            average,
        }
    }
}

/// A graded course unit (UE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Raw code, possibly carrying a group suffix (e.g. "SM102PM-2526PSA01")
    pub code: String,

    pub name: String,

    #[serde(default)]
    pub average: Option<f64>,

    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Subject {
    pub fn new(code: impl Into<String>, name: impl Into<String>, average: Option<f64>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            average,
            modules: Vec::new(),
        }
    }

    /// Builder method to attach modules.
    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }
}

/// One student's results for one (academic year, semester) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    pub user_id: String,

    pub academic_year: AcademicYear,

    pub semester: Semester,

    /// Degree cursus (top-level program)
    pub cursus: String,

    /// Track within the cursus
    pub filiere: String,

    /// Class cohort within the filiere
    pub groupe: String,

    /// Optional finer subgroup; empty or absent means "use groupe"
    #[serde(default)]
    pub branch: Option<String>,

    /// Overall average, None until something has been graded
    #[serde(default)]
    pub average: Option<f64>,

    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl SemesterRecord {
    /// Create a record with no branch, no average and no subjects.
    pub fn new(
        user_id: impl Into<String>,
        period: Period,
        cursus: impl Into<String>,
        filiere: impl Into<String>,
        groupe: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            academic_year: period.academic_year,
            semester: period.semester,
            cursus: cursus.into(),
            filiere: filiere.into(),
            groupe: groupe.into(),
            branch: None,
            average: None,
            subjects: Vec::new(),
        }
    }

    /// Builder method to set the branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Builder method to set the overall average.
    pub fn with_average(mut self, average: f64) -> Self {
        self.average = Some(average);
        self
    }

    /// Builder method to set the subjects.
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn period(&self) -> Period {
        Period::new(self.academic_year, self.semester)
    }

    /// The branch if set and non-blank.
    pub fn branch(&self) -> Option<&str> {
        self.branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }

    /// Branch if present, otherwise the groupe.
    pub fn effective_group(&self) -> &str {
        self.branch().unwrap_or(&self.groupe)
    }

    /// Filiere if present, otherwise the groupe. Used for cursus-wide views.
    pub fn effective_filiere(&self) -> &str {
        let filiere = self.filiere.trim();
        if filiere.is_empty() {
            &self.groupe
        } else {
            filiere
        }
    }
}
