//! Configuration error model.

use thiserror::Error;

/// Result type used when building or loading access-control configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-time failure.
///
/// Access decisions never produce errors (they fail closed); this type only
/// covers problems detected while constructing the role registry and policy
/// list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The same role id was defined more than once.
    #[error("duplicate role definition: {0}")]
    DuplicateRole(String),

    /// A role inherits from a role that is not defined.
    #[error("role '{role}' inherits from undefined role '{parent}'")]
    UnknownParent { role: String, parent: String },

    /// The inheritance graph contains a cycle (listed in traversal order).
    #[error("inheritance cycle: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    /// The same policy rule id was configured more than once.
    #[error("duplicate policy rule: {0}")]
    DuplicateRule(String),

    /// A policy rule is malformed (e.g. no actions).
    #[error("invalid policy rule '{id}': {reason}")]
    InvalidRule { id: String, reason: String },

    /// The configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configuration document could not be read.
    #[error("io error: {0}")]
    Io(String),
}

impl ConfigError {
    pub fn invalid_rule(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
