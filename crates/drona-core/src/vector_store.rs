//! Vector store trait

use async_trait::async_trait;

use crate::{DocumentChunk, Result, ScoredChunk};

/// Trait for vector stores holding one named collection of chunks
///
/// The store owns no business logic: it appends, searches, and counts.
/// `query` results come back ordered by ascending distance (best match
/// first); ties keep the store's native order and callers must not re-sort.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append chunks to the collection.
    ///
    /// Chunks with inconsistent embedding dimensions are rejected before
    /// submission with [`Error::Ingestion`](crate::Error::Ingestion).
    async fn add(&self, chunks: &[DocumentChunk]) -> Result<()>;

    /// Search for the `k` nearest chunks to the given vector.
    ///
    /// An empty collection yields an empty result, not an error; asking for
    /// more results than exist yields fewer.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    /// Total number of chunks in the collection
    async fn count(&self) -> Result<usize>;
}
