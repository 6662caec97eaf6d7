use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// An internship posting evaluated against a profile.
///
/// `verified`/`active`/`application_deadline` are carried for the
/// collaborator's pool pre-filter; the engine itself never re-checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub org: String,
    pub org_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub skills_nice_to_have: Vec<String>,
    #[serde(default)]
    pub education_required: EducationRequired,
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    pub stipend: f64,
    pub duration_months: u32,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language_required: Vec<String>,
    #[serde(default)]
    pub diversity_eligibility: DiversityEligibility,
    #[serde(default)]
    pub geo: Option<GeoPoint>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Education gate published with a posting. Empty lists mean "no
/// requirement"; rule documents express that with `when` guards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationRequired {
    #[serde(default)]
    pub degree: Vec<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub year_min: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiversityEligibility {
    #[serde(default)]
    pub women_only: bool,
    #[serde(default)]
    pub pwd_friendly: bool,
    #[serde(default)]
    pub ews_priority: bool,
}

fn default_true() -> bool {
    true
}
