use std::collections::BTreeSet;
use std::path::Path;

use match_model::RuleSet;

use crate::error::ConfigError;

/// The rule document shipped with the tool; used whenever the collaborator
/// does not supply its own.
const DEFAULT_RULES_TOML: &str = include_str!("../rules/default.toml");

enum Format {
    Toml,
    Json,
}

/// Load a rule document from disk, dispatching on the file extension.
///
/// Structural failures are fatal to the caller by design: a rule document
/// that does not parse means no ranking can run at all, as opposed to a
/// single bad expression inside an otherwise valid document, which the
/// engine degrades per-rule at evaluation time.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Format::Toml,
        Some("json") => Format::Json,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        Format::Toml => rules_from_toml(&text, path),
        Format::Json => rules_from_json(&text, path),
    }
}

/// Parse a TOML rule document. `origin` is used for error context only.
pub fn rules_from_toml(text: &str, origin: &Path) -> Result<RuleSet, ConfigError> {
    let rules: RuleSet = toml::from_str(text).map_err(|error| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: error.to_string(),
    })?;
    validate(&rules)?;
    Ok(rules)
}

/// Parse a JSON rule document. `origin` is used for error context only.
pub fn rules_from_json(text: &str, origin: &Path) -> Result<RuleSet, ConfigError> {
    let rules: RuleSet = serde_json::from_str(text).map_err(|error| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: error.to_string(),
    })?;
    validate(&rules)?;
    Ok(rules)
}

/// The built-in rule document.
pub fn default_rules() -> Result<RuleSet, ConfigError> {
    rules_from_toml(DEFAULT_RULES_TOML, Path::new("<built-in rules>"))
}

/// Structural checks beyond deserialization. Expression syntax is
/// deliberately NOT checked here: a malformed expression degrades per-rule
/// at evaluation time instead of rejecting the whole document.
fn validate(rules: &RuleSet) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for (index, rule) in rules.hard_rules.iter().enumerate() {
        check_id(&mut seen, &rule.id, "hard_rules", index)?;
    }
    let mut seen = BTreeSet::new();
    for (index, rule) in rules.soft_rules.iter().enumerate() {
        check_id(&mut seen, &rule.id, "soft_rules", index)?;
    }
    Ok(())
}

fn check_id(
    seen: &mut BTreeSet<String>,
    id: &str,
    section: &'static str,
    index: usize,
) -> Result<(), ConfigError> {
    if id.trim().is_empty() {
        return Err(ConfigError::BlankRuleId { section, index });
    }
    if !seen.insert(id.to_string()) {
        return Err(ConfigError::DuplicateRuleId { id: id.to_string() });
    }
    Ok(())
}
