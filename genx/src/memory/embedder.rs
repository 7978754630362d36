//! Embedder contract (grounded on the teacher's `memory::embedder::Embedder`
//! trait): produces fixed-size float vectors from text for segment storage
//! and recall queries (spec §4.5, §4.6).

use async_trait::async_trait;

use super::error::MemoryError;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MemoryError>;

    fn dimension(&self) -> usize;
}
