//! Skill-set normalization and similarity helpers.
//!
//! All functions are pure and deterministic; `BTreeSet` keeps derived skill
//! sets in a stable order regardless of input order.

use std::collections::BTreeSet;

/// Canonical skill name mapped to alternate spellings seen in the wild.
/// Extending this table is a code change, never user input.
const SKILL_ALIASES: &[(&str, &[&str])] = &[
    ("ms excel", &["excel", "spreadsheets"]),
    ("javascript", &["js"]),
    ("c++", &["cpp", "c plus plus"]),
    ("python", &["py"]),
];

/// Lower-case and trim every skill, then add the canonical name for any
/// alias present. "js" therefore also yields "javascript", so a posting
/// listing either spelling matches.
pub fn normalize_skills<S: AsRef<str>>(skills: &[S]) -> BTreeSet<String> {
    let mut set: BTreeSet<String> = skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    for (canonical, alternates) in SKILL_ALIASES {
        if alternates.iter().any(|alias| set.contains(*alias)) {
            set.insert((*canonical).to_string());
        }
    }
    set
}

/// Intersection over union. Returns 0.0 when both sets are empty.
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// 1.0 iff any role term occurs as a case-insensitive substring of the
/// concatenated title and description, else 0.0.
pub fn keyword_match<S: AsRef<str>>(role_terms: &[S], title: &str, description: &str) -> f64 {
    let haystack = format!("{} {}", title, description).to_lowercase();
    let hit = role_terms.iter().any(|term| {
        let needle = term.as_ref().trim().to_lowercase();
        !needle.is_empty() && haystack.contains(&needle)
    });
    if hit { 1.0 } else { 0.0 }
}
