use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Outcome of evaluating one profile/candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationResult {
    /// At least one hard rule failed; all failures are collected.
    Ineligible { failures: Vec<RuleFailure> },
    /// Every applicable hard rule passed.
    Eligible { score: f64, explain: Explain },
}

impl EvaluationResult {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Eligible { score, .. } => Some(*score),
            Self::Ineligible { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub reason: String,
}

/// Transparency breakdown attached to every eligible evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explain {
    /// Hard rules whose guard was satisfied and whose check passed.
    pub passed_rules: Vec<String>,
    /// Per-rule soft scores (unweighted, rounded to 3 decimals).
    pub soft_scores: BTreeMap<String, f64>,
    /// Applied fairness boost after the per-session cap.
    pub fairness: f64,
    /// Raw tie-breaker sum before the 1e-3 scaling.
    pub tie_breaker: f64,
}

/// One entry of a ranked result. Borrows the candidate from the pool; the
/// ranking is produced fresh per request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch<'a> {
    pub candidate: &'a Candidate,
    pub score: f64,
    pub explain: Explain,
}

/// Collaborator-facing record shaped from a `RankedMatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate_id: String,
    pub title: String,
    pub org: String,
    /// Display location; carries a " / Remote" suffix for remote-eligible
    /// postings.
    pub location: String,
    pub stipend: f64,
    pub duration_months: u32,
    pub score: f64,
    pub why: Explain,
}
