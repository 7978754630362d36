//! Per-persona memory engine: a graph of entities/relations plus
//! time-bucketed segments, a pluggable KV store and vector index, and
//! composite recall (spec §3, §4.5, §4.6).

mod embedder;
mod entity;
mod error;
mod host;
mod kv;
mod recall;
mod segment;
mod vector;

pub use embedder::Embedder;
pub use entity::{Entity, Graph, Relation};
pub use error::MemoryError;
pub use host::{Host, Memory};
pub use kv::{join_key, InMemoryKvStore, KvStore};
pub use recall::{recall, RecallQuery, RecallResult};
pub use segment::{bucket_key, MemorySegment, BUCKET_SECONDS};
pub use vector::{HnswVectorIndex, VectorIndex};
