//! Separator-namespaced KV store (spec §4.5 "A Host owns one KV store...
//! separator byte", §5 "safe for concurrent reads and writes").

use dashmap::DashMap;
use serde_json::Value;

use super::error::MemoryError;

/// Joins namespace segments with `sep` into one flat key, e.g. persona `p1`,
/// kind `segments`, bucket `12345`, id `seg-1` joins (with `sep = '/'`) into
/// `p1/segments/12345/seg-1`.
pub fn join_key(sep: char, parts: &[&str]) -> String {
    parts.join(&sep.to_string())
}

pub trait KvStore: Send + Sync {
    fn put(&self, key: &str, value: Value) -> Result<(), MemoryError>;
    fn get(&self, key: &str) -> Result<Option<Value>, MemoryError>;
    fn delete(&self, key: &str) -> Result<(), MemoryError>;
    /// Every stored key with the given prefix (used to list segments under
    /// a bucket, or all buckets under a persona).
    fn list_prefix(&self, prefix: &str) -> Result<Vec<String>, MemoryError>;
}

/// Plain in-memory `KvStore`. Safe for concurrent access via `DashMap`; no
/// cross-operation transaction is offered (spec §5).
#[derive(Default)]
pub struct InMemoryKvStore {
    data: DashMap<String, Value>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKvStore {
    fn put(&self, key: &str, value: Value) -> Result<(), MemoryError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, MemoryError> {
        Ok(self.data.get(key).map(|v| v.clone()))
    }

    fn delete(&self, key: &str) -> Result<(), MemoryError> {
        self.data.remove(key);
        Ok(())
    }

    fn list_prefix(&self, prefix: &str) -> Result<Vec<String>, MemoryError> {
        Ok(self
            .data
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect())
    }
}
