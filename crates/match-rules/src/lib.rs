mod error;
mod loader;

pub use error::ConfigError;
pub use loader::{default_rules, load_rules, rules_from_json, rules_from_toml};
