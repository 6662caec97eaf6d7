use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read rule document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule document {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported rule document format: {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("duplicate rule id in document: {id}")]
    DuplicateRuleId { id: String },

    #[error("rule at position {index} in `{section}` has a blank id")]
    BlankRuleId { section: &'static str, index: usize },
}
