//! HNSW-backed vector index with atomic persistence (spec §4.5, §6
//! "Vector-store file").
//!
//! Grounded on the teacher's `InMemoryVectorStore` (cosine-similarity
//! search over an in-memory collection) but backed by `hnsw_rs` for
//! approximate nearest-neighbour search at scale, with our own parallel
//! `(id, vector)` log kept alongside purely so the index can be persisted
//! and rebuilt — `hnsw_rs` does not expose its internal storage for dump.

use std::path::Path;
use std::sync::RwLock;

use dashmap::DashMap;
use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::MemoryError;

pub trait VectorIndex: Send + Sync {
    fn insert(&self, id: &str, vector: Vec<f32>) -> Result<(), MemoryError>;
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>, MemoryError>;
    fn dimension(&self) -> usize;
}

const VECTOR_INDEX_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    dimension: usize,
    entries: Vec<(String, Vec<f32>)>,
}

pub struct HnswVectorIndex {
    dimension: usize,
    capacity: usize,
    hnsw: RwLock<Hnsw<'static, f32, DistCosine>>,
    entries: RwLock<Vec<(String, Vec<f32>)>>,
    id_lookup: DashMap<String, usize>,
}

impl HnswVectorIndex {
    pub fn new(dimension: usize, capacity: usize) -> Self {
        let hnsw = Hnsw::<f32, DistCosine>::new(16, capacity, 16, 200, DistCosine {});
        HnswVectorIndex {
            dimension,
            capacity,
            hnsw: RwLock::new(hnsw),
            entries: RwLock::new(Vec::new()),
            id_lookup: DashMap::new(),
        }
    }

    fn insert_unchecked(&self, id: String, vector: Vec<f32>) -> Result<(), MemoryError> {
        let mut entries = self.entries.write().unwrap();
        let idx = entries.len();
        if idx >= self.capacity {
            return Err(MemoryError::Persistence("vector index capacity exceeded".into()));
        }
        self.hnsw.write().unwrap().insert((&vector, idx));
        self.id_lookup.insert(id.clone(), idx);
        entries.push((id, vector));
        Ok(())
    }

    /// Atomically persists to `path`: write to a temp file, then rename
    /// (spec §4.5 "atomic: write to temp, rename").
    pub fn save(&self, path: &Path) -> Result<(), MemoryError> {
        let persisted = PersistedIndex {
            version: VECTOR_INDEX_VERSION,
            dimension: self.dimension,
            entries: self.entries.read().unwrap().clone(),
        };
        let bytes = rmp_serde::to_vec_named(&persisted)
            .map_err(|e| MemoryError::Persistence(e.to_string()))?;
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Loads from `path`. A corrupt file or a dimension mismatch returns
    /// [`MemoryError::IndexRebuildRequired`]; the caller should log a
    /// warning and construct a fresh index rather than treat this as fatal
    /// (spec §4.5).
    pub fn load(path: &Path, dimension: usize, capacity: usize) -> Result<Self, MemoryError> {
        let bytes = std::fs::read(path)?;
        let persisted: PersistedIndex = rmp_serde::from_slice(&bytes)
            .map_err(|e| MemoryError::IndexRebuildRequired(e.to_string()))?;
        if persisted.version != VECTOR_INDEX_VERSION {
            return Err(MemoryError::IndexRebuildRequired(format!(
                "unsupported version {}",
                persisted.version
            )));
        }
        if persisted.dimension != dimension {
            return Err(MemoryError::IndexRebuildRequired(format!(
                "dimension mismatch: file has {}, configured embedder has {}",
                persisted.dimension, dimension
            )));
        }
        let index = HnswVectorIndex::new(dimension, capacity);
        for (id, vector) in persisted.entries {
            index.insert_unchecked(id, vector)?;
        }
        Ok(index)
    }
}

impl VectorIndex for HnswVectorIndex {
    fn insert(&self, id: &str, vector: Vec<f32>) -> Result<(), MemoryError> {
        if vector.len() != self.dimension {
            return Err(MemoryError::Embedding(format!(
                "expected dimension {}, got {}",
                self.dimension,
                vector.len()
            )));
        }
        self.insert_unchecked(id.to_string(), vector)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>, MemoryError> {
        if query.len() != self.dimension {
            return Err(MemoryError::Embedding(format!(
                "expected dimension {}, got {}",
                self.dimension,
                query.len()
            )));
        }
        let entries = self.entries.read().unwrap();
        let neighbours = self.hnsw.read().unwrap().search(query, k, 64);
        Ok(neighbours
            .into_iter()
            .filter_map(|n| entries.get(n.d_id).map(|(id, _)| (id.clone(), 1.0 - n.distance)))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_search_finds_nearest() {
        let index = HnswVectorIndex::new(3, 100);
        index.insert("a", vec![1.0, 0.0, 0.0]).unwrap();
        index.insert("b", vec![0.0, 1.0, 0.0]).unwrap();
        let hits = index.search(&[0.9, 0.1, 0.0], 1).unwrap();
        assert_eq!(hits[0].0, "a");
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let index = HnswVectorIndex::new(3, 100);
        assert!(index.insert("a", vec![1.0, 0.0]).is_err());
    }

    #[test]
    fn save_and_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let index = HnswVectorIndex::new(2, 100);
        index.insert("a", vec![1.0, 0.0]).unwrap();
        index.save(&path).unwrap();

        let reloaded = HnswVectorIndex::load(&path, 2, 100).unwrap();
        let hits = reloaded.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].0, "a");
    }

    #[test]
    fn dimension_mismatch_requests_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let index = HnswVectorIndex::new(2, 100);
        index.insert("a", vec![1.0, 0.0]).unwrap();
        index.save(&path).unwrap();

        let err = HnswVectorIndex::load(&path, 5, 100).unwrap_err();
        assert!(matches!(err, MemoryError::IndexRebuildRequired(_)));
    }

    #[test]
    fn corrupt_file_requests_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        std::fs::write(&path, b"not a valid index").unwrap();
        let err = HnswVectorIndex::load(&path, 2, 100).unwrap_err();
        assert!(matches!(err, MemoryError::IndexRebuildRequired(_)));
    }
}
