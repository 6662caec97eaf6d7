//! Record loading and the collaborator-side pool pre-filter.
//!
//! The engine deliberately performs no `verified`/`active`/deadline checks;
//! that boundary lives here, before candidates ever reach it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;

use match_model::{Candidate, DiversityEligibility, EducationRequired, GeoPoint, Profile};

pub fn load_profile(path: &Path) -> Result<Profile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read profile: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse profile: {}", path.display()))
}

pub fn load_candidate(path: &Path) -> Result<Candidate> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read candidate: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse candidate: {}", path.display()))
}

/// Load a candidate pool from a JSON array or a CSV file, by extension.
pub fn load_pool(path: &Path) -> Result<Vec<Candidate>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read pool: {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parse pool: {}", path.display()))
        }
        Some("csv") => read_csv_pool(path),
        _ => bail!("unsupported pool format: {} (expected .json or .csv)", path.display()),
    }
}

/// Drop candidates the engine must never see: unverified, inactive, or past
/// their application deadline.
pub fn prefilter_pool(pool: Vec<Candidate>, now: DateTime<Utc>) -> Vec<Candidate> {
    pool.into_iter()
        .filter(|candidate| {
            candidate.verified
                && candidate.active
                && candidate
                    .application_deadline
                    .is_none_or(|deadline| deadline >= now)
        })
        .collect()
}

/// CSV pool format: one posting per row. List-valued columns
/// (`skills_required`, `skills_nice_to_have`, `degree`, `branches`,
/// `language_required`) are `;`-separated. Timestamps are RFC 3339 or
/// `YYYY-MM-DD`.
fn read_csv_pool(path: &Path) -> Result<Vec<Candidate>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .clone();
    let mut pool = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = BTreeMap::new();
        for (column, value) in record.iter().enumerate() {
            let key = headers
                .get(column)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        let candidate = candidate_from_row(&row)
            .with_context(|| format!("row {} of {}", index + 1, path.display()))?;
        pool.push(candidate);
    }
    Ok(pool)
}

fn candidate_from_row(row: &BTreeMap<String, String>) -> Result<Candidate> {
    Ok(Candidate {
        id: required(row, "id")?,
        title: required(row, "title")?,
        org: required(row, "org")?,
        org_type: required(row, "org_type")?,
        description: optional(row, "description").unwrap_or_default(),
        skills_required: list(row, "skills_required"),
        skills_nice_to_have: list(row, "skills_nice_to_have"),
        education_required: EducationRequired {
            degree: list(row, "degree"),
            branches: list(row, "branches"),
            year_min: parse_optional(row, "year_min", "integer", |s| s.parse().ok())?,
        },
        location: required(row, "location")?,
        is_remote: flag(row, "is_remote"),
        stipend: parse_optional(row, "stipend", "number", |s| s.parse().ok())?
            .context("missing required column: stipend")?,
        duration_months: parse_optional(row, "duration_months", "integer", |s| s.parse().ok())?
            .context("missing required column: duration_months")?,
        application_deadline: parse_optional(
            row,
            "application_deadline",
            "timestamp",
            parse_timestamp,
        )?,
        posted_at: parse_optional(row, "posted_at", "timestamp", parse_timestamp)?,
        language_required: list(row, "language_required"),
        diversity_eligibility: DiversityEligibility {
            women_only: flag(row, "women_only"),
            pwd_friendly: flag(row, "pwd_friendly"),
            ews_priority: flag(row, "ews_priority"),
        },
        geo: geo_point(row)?,
        verified: flag(row, "verified"),
        active: optional(row, "active").is_none_or(|value| parse_bool(&value)),
    })
}

fn required(row: &BTreeMap<String, String>, key: &str) -> Result<String> {
    match optional(row, key) {
        Some(value) => Ok(value),
        None => bail!("missing required column: {key}"),
    }
}

fn optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn list(row: &BTreeMap<String, String>, key: &str) -> Vec<String> {
    optional(row, key)
        .map(|value| {
            value
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn flag(row: &BTreeMap<String, String>, key: &str) -> bool {
    optional(row, key).is_some_and(|value| parse_bool(&value))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

fn parse_optional<T>(
    row: &BTreeMap<String, String>,
    key: &str,
    kind: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match optional(row, key) {
        None => Ok(None),
        Some(value) => match parse(&value) {
            Some(parsed) => Ok(Some(parsed)),
            None => bail!("column {key}: `{value}` is not a valid {kind}"),
        },
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn geo_point(row: &BTreeMap<String, String>) -> Result<Option<GeoPoint>> {
    let lon = parse_optional(row, "lon", "number", |s| s.parse().ok())?;
    let lat = parse_optional(row, "lat", "number", |s| s.parse().ok())?;
    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok(Some(GeoPoint { lon, lat })),
        (None, None) => Ok(None),
        _ => bail!("columns lon/lat must be present together"),
    }
}
