//! Model-config errors (spec §7 "Config errors").

use thiserror::Error;

/// Always fatal to the single document being parsed; the directory walk
/// continues on sibling documents (spec §7, §4.2).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid schema string: {0:?}")]
    InvalidSchema(String),

    #[error("unknown document type: {0:?}")]
    UnknownType(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value:?}")]
    InvalidEnum { field: &'static str, value: String },

    #[error("duplicate step id {0:?} in composite tool")]
    DuplicateStepId(String),

    #[error("invalid jq expression: {0}")]
    InvalidJq(String),

    #[error("invalid JSON schema: {0}")]
    InvalidJsonSchema(String),

    #[error("registration conflict for pattern {pattern:?}: already bound to {existing:?}")]
    RegistrationConflict { pattern: String, existing: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error reading {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
