//! Subject and module code normalization.
//!
//! Equivalent offerings taught to different class sections carry a section
//! suffix on the course part of their code (`SM102PM-2526PSA01`,
//! `SM102I-2526PSA01`). Stripping it lets all sections share one
//! statistics bucket.

use crate::models::ModuleKey;

/// Section suffixes on subject codes, in match priority order.
pub const SUBJECT_SUFFIXES: [&str; 4] = ["PM", "I", "P", "BN"];

/// Section suffixes on module codes, in match priority order.
pub const MODULE_SUFFIXES: [&str; 3] = ["PM", "I", "P"];

/// Normalize a raw subject code.
pub fn normalize_subject_code(code: &str) -> String {
    strip_section_suffix(code, &SUBJECT_SUFFIXES)
}

/// Normalize a raw module code.
pub fn normalize_module_code(code: &str) -> String {
    strip_section_suffix(code, &MODULE_SUFFIXES)
}

/// Statistics key of a module within its parent subject.
pub fn module_key(subject_code: &str, module_code: &str) -> ModuleKey {
    ModuleKey::new(
        normalize_subject_code(subject_code),
        normalize_module_code(module_code),
    )
}

/// Strip the first matching suffix from the course part of `code`.
///
/// The course part is everything before the first `-`; the year/section tag
/// after it is kept verbatim. A suffix is skipped when stripping it would
/// leave an empty stem, or a stem that itself ends in a suffix, so a second
/// pass finds nothing left to strip.
fn strip_section_suffix(code: &str, suffixes: &[&str]) -> String {
    let (course, tag) = match code.find('-') {
        Some(idx) => code.split_at(idx),
        None => (code, ""),
    };

    for suffix in suffixes {
        let Some(stem) = course.strip_suffix(suffix) else {
            continue;
        };
        if stem.is_empty() || suffixes.iter().any(|s| stem.ends_with(s)) {
            continue;
        }
        return format!("{stem}{tag}");
    }

    code.to_string()
}
