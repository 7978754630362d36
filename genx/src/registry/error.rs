//! Error types for the registry muxer.

use thiserror::Error;

/// Error returned by [`crate::registry::Mux`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MuxError {
    /// `Handle` was called with a pattern that conflicts with one already
    /// registered. Carries the conflicting pattern and the literal of the
    /// pattern already holding that slot.
    #[error("pattern {pattern:?} conflicts with already-registered pattern {existing:?}")]
    Conflict { pattern: String, existing: String },

    /// `Resolve` found no handler whose pattern matches the queried name.
    #[error("no handler registered for {0:?}")]
    NotFound(String),
}
