//! Memory engine errors (spec §3 invariants, §4.5, §4.6).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    /// An edge referenced an entity that does not exist (spec §3 "Graph:
    /// if `{from -> to}` exists, both entities exist").
    #[error("entity not found: {0:?}")]
    NotFound(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("vector index persistence error: {0}")]
    Persistence(String),

    /// Vector file failed to load (corrupt or dimension mismatch); the
    /// caller should fall back to a fresh index, not treat this as fatal
    /// (spec §4.5 "a corrupted vector file triggers a warning and fresh
    /// initialization").
    #[error("vector index unreadable, rebuilding: {0}")]
    IndexRebuildRequired(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
