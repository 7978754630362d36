//! `Host` and per-persona `Memory` view (spec §4.5).

use std::sync::Arc;

use dashmap::DashMap;

use super::embedder::Embedder;
use super::entity::Graph;
use super::error::MemoryError;
use super::kv::{join_key, KvStore};
use super::recall::{recall, RecallQuery, RecallResult};
use super::segment::{bucket_key, MemorySegment};
use super::vector::VectorIndex;

/// Owns one KV store, one optional vector index, one optional embedder, and
/// a separator byte; multiplexes any number of personas (spec §4.5).
pub struct Host {
    kv: Arc<dyn KvStore>,
    vector: Option<Arc<dyn VectorIndex>>,
    embedder: Option<Arc<dyn Embedder>>,
    sep: char,
    graphs: DashMap<String, Arc<Graph>>,
}

impl Host {
    pub fn new(
        kv: Arc<dyn KvStore>,
        vector: Option<Arc<dyn VectorIndex>>,
        embedder: Option<Arc<dyn Embedder>>,
        sep: char,
    ) -> Self {
        Host {
            kv,
            vector,
            embedder,
            sep,
            graphs: DashMap::new(),
        }
    }

    pub fn memory(&self, persona_id: impl Into<String>) -> Memory<'_> {
        let persona_id = persona_id.into();
        let graph = self
            .graphs
            .entry(persona_id.clone())
            .or_insert_with(|| Arc::new(Graph::new()))
            .clone();
        Memory {
            host: self,
            persona_id,
            graph,
        }
    }
}

/// A persona-scoped view over a [`Host`]: keys are namespaced by persona id.
pub struct Memory<'h> {
    host: &'h Host,
    persona_id: String,
    graph: Arc<Graph>,
}

impl<'h> Memory<'h> {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn segment_key(&self, bucket: &str, id: &str) -> String {
        join_key(self.host.sep, &[&self.persona_id, "segments", bucket, id])
    }

    fn segments_prefix(&self, bucket: Option<&str>) -> String {
        match bucket {
            Some(b) => format!("{}{}", join_key(self.host.sep, &[&self.persona_id, "segments", b]), self.host.sep),
            None => format!("{}{}", join_key(self.host.sep, &[&self.persona_id, "segments"]), self.host.sep),
        }
    }

    /// Persists `segment` under `persona/segments/<bucket>/<id>`, and — if
    /// an embedder is configured — embeds the summary and inserts it into
    /// the vector index (spec §4.5 `StoreSegment`).
    pub async fn store_segment(&self, mut segment: MemorySegment) -> Result<(), MemoryError> {
        let bucket = bucket_key(segment.unix_epoch);
        if let Some(embedder) = &self.host.embedder {
            let vectors = embedder.embed(&[segment.summary.as_str()]).await?;
            let vector = vectors
                .into_iter()
                .next()
                .ok_or_else(|| MemoryError::Embedding("embedder returned no vector".into()))?;
            segment.vector = Some(vector.clone());
            if let Some(index) = &self.host.vector {
                index.insert(&segment.id, vector)?;
            }
        }
        let value = serde_json::to_value(&segment).map_err(|e| MemoryError::Persistence(e.to_string()))?;
        self.host.kv.put(&self.segment_key(&bucket, &segment.id), value)?;
        tracing::debug!(persona = %self.persona_id, segment = %segment.id, bucket = %bucket, "memory: stored segment");
        Ok(())
    }

    pub fn list_segment_ids(&self, bucket: Option<&str>) -> Result<Vec<String>, MemoryError> {
        let prefix = self.segments_prefix(bucket);
        let keys = self.host.kv.list_prefix(&prefix)?;
        Ok(keys.into_iter().map(|k| k.rsplit(self.host.sep).next().unwrap_or("").to_string()).collect())
    }

    pub fn get_segment(&self, bucket: &str, id: &str) -> Result<Option<MemorySegment>, MemoryError> {
        let value = self.host.kv.get(&self.segment_key(bucket, id))?;
        Ok(match value {
            Some(v) => Some(serde_json::from_value(v).map_err(|e| MemoryError::Persistence(e.to_string()))?),
            None => None,
        })
    }

    /// All segments stored for this persona, across all buckets. Used by
    /// [`Memory::recall`] for candidate gathering.
    fn all_segments(&self) -> Result<Vec<MemorySegment>, MemoryError> {
        let prefix = self.segments_prefix(None);
        let mut out = Vec::new();
        for key in self.host.kv.list_prefix(&prefix)? {
            if let Some(v) = self.host.kv.get(&key)? {
                out.push(serde_json::from_value(v).map_err(|e| MemoryError::Persistence(e.to_string()))?);
            }
        }
        Ok(out)
    }

    pub async fn recall(&self, query: RecallQuery) -> Result<RecallResult, MemoryError> {
        let segments = self.all_segments()?;
        recall(&self.graph, &segments, self.host.embedder.as_deref(), query).await
    }
}
