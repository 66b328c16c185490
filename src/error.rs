use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Error type for the NavAbility SDK
#[derive(Debug, Error)]
pub enum SdkError {
    /// Errors raised by the injected transport, passed through unmodified
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response did not contain exactly one user/robot/session
    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// More than one entity matched a single-label lookup
    #[error("More than one {entity} named '{label}' returned ({count} matches)")]
    AmbiguousResult {
        /// Entity kind ("variable" or "factor")
        entity: &'static str,
        /// The label that was looked up
        label: String,
        /// Number of entities the server returned
        count: usize,
    },

    /// A payload field failed schema validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Errors related to serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A watched request reached a failed state
    #[error("Request {request_id} finished in state '{state}'")]
    Status {
        /// Request identifier returned by the mutation
        request_id: String,
        /// Terminal state reported by the server
        state: String,
    },

    /// Waiting on the server exceeded its budget
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The blocking facade could not start its runtime
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Conversion from serde_json::Error to SdkError
impl From<serde_json::Error> for SdkError {
    fn from(error: serde_json::Error) -> Self {
        SdkError::Serialization(error.to_string())
    }
}

/// Result type alias for operations that can result in an SdkError
pub type SdkResult<T> = Result<T, SdkError>;

/// Levels of the `users[].robots[].sessions[]` response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeLevel {
    Users,
    Robots,
    Sessions,
}

impl EnvelopeLevel {
    /// Key under which this level appears in the response
    pub fn key(&self) -> &'static str {
        match self {
            EnvelopeLevel::Users => "users",
            EnvelopeLevel::Robots => "robots",
            EnvelopeLevel::Sessions => "sessions",
        }
    }

    /// Singular name used in messages
    pub fn entity(&self) -> &'static str {
        match self {
            EnvelopeLevel::Users => "user",
            EnvelopeLevel::Robots => "robot",
            EnvelopeLevel::Sessions => "session",
        }
    }
}

impl fmt::Display for EnvelopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shape violations of the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The level key is absent or is not a list
    #[error("'{level}' missing from response")]
    Missing { level: EnvelopeLevel },

    /// The level holds zero or several entries instead of exactly one
    #[error("expected exactly one {}, found {count}", .level.entity())]
    WrongCount { level: EnvelopeLevel, count: usize },

    /// The session does not carry the requested entity list
    #[error("session has no '{key}' list")]
    MissingEntities { key: String },
}

impl EnvelopeError {
    /// The envelope level at fault, if the error concerns one
    pub fn level(&self) -> Option<EnvelopeLevel> {
        match self {
            EnvelopeError::Missing { level } | EnvelopeError::WrongCount { level, .. } => {
                Some(*level)
            }
            EnvelopeError::MissingEntities { .. } => None,
        }
    }
}

/// A schema decode failure naming the offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {message}")]
pub struct ValidationError {
    /// Dotted path of the field, e.g. `ppes.default.mean`
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefix the field path with the enclosing field
    pub fn nested(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            message: self.message,
        }
    }
}
