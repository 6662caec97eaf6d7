use thiserror::Error;

/// Failure while compiling or evaluating a rule expression.
///
/// These are always local to one rule: the engine catches them per-rule and
/// degrades the rule (hard rule fails, soft rule scores 0) instead of
/// aborting the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character `{ch}` at byte {at}")]
    UnexpectedChar { ch: char, at: usize },

    #[error("unterminated string literal starting at byte {at}")]
    UnterminatedString { at: usize },

    #[error("invalid number `{text}` at byte {at}")]
    InvalidNumber { text: String, at: usize },

    #[error("unexpected token `{found}` at byte {at}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        at: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String },

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("rule `{rule_id}`: {source}")]
    InRule {
        rule_id: String,
        #[source]
        source: Box<ExpressionError>,
    },
}

impl ExpressionError {
    /// Attach the id of the rule this expression belongs to.
    pub fn for_rule(self, rule_id: &str) -> Self {
        match self {
            Self::InRule { .. } => self,
            other => Self::InRule {
                rule_id: rule_id.to_string(),
                source: Box::new(other),
            },
        }
    }
}
