use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A candidate profile as supplied by the collaborator layer.
///
/// Immutable for the duration of one ranking call. Collections default to
/// empty and genuinely optional sections are `Option` so that a sparse
/// profile deserializes cleanly; rule expressions see missing sections as
/// `null` and evaluate falsy rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub education: Option<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub language_pref: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    pub constraints: Constraints,
    #[serde(default)]
    pub geo: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub branch: String,
    pub year: u32,
    pub cgpa: f64,
}

/// Soft preferences. These never gate eligibility on their own; rule
/// expressions decide how much weight they carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub min_stipend: f64,
    #[serde(default)]
    pub org_types: Vec<String>,
}

/// Attributes read by the fairness phase and by diversity-gated hard rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub disability: bool,
    pub gender: Gender,
    pub income_band: IncomeBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeBand {
    #[serde(rename = "EWS")]
    Ews,
    #[serde(rename = "General")]
    General,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
}
