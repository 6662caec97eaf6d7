use serde::{Deserialize, Serialize};

/// A loaded rule document. Built once by `match-rules`, shared read-only by
/// every evaluation thereafter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub hard_rules: Vec<HardRule>,
    #[serde(default)]
    pub soft_rules: Vec<SoftRule>,
    #[serde(default)]
    pub fairness: Fairness,
    #[serde(default)]
    pub tie_breakers: Vec<String>,
}

/// Boolean eligibility gate. Any failed hard rule excludes the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardRule {
    pub id: String,
    /// Optional guard expression. When it evaluates falsy the rule is
    /// skipped entirely, counting neither as passed nor failed.
    #[serde(default)]
    pub when: Option<String>,
    pub check: String,
    #[serde(default)]
    pub fail_reason: Option<String>,
}

/// Weighted numeric scoring heuristic applied to eligible candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftRule {
    pub id: String,
    pub score: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fairness {
    #[serde(default)]
    pub diversity_boost: DiversityBoost,
    #[serde(default = "default_cap")]
    pub cap_per_session: f64,
}

impl Default for Fairness {
    fn default() -> Self {
        Self {
            diversity_boost: DiversityBoost::default(),
            cap_per_session: default_cap(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiversityBoost {
    #[serde(default)]
    pub women: Option<f64>,
    #[serde(default)]
    pub pwd: Option<f64>,
    #[serde(default)]
    pub ews: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

fn default_cap() -> f64 {
    0.2
}
