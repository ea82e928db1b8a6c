//! In-memory vector store

use std::sync::RwLock;

use async_trait::async_trait;

use drona_core::{DocumentChunk, Error, Result, ScoredChunk, VectorStore};

use crate::client::validate_dimensions;

/// In-memory cosine-distance vector store
///
/// Holds chunks in insertion order and serves queries by ascending cosine
/// distance with a stable sort, so equal distances keep insertion order.
/// Used by tests and offline runs; no persistence.
pub struct MemoryStore {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 1.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }

        1.0 - dot_product / (norm_a * norm_b)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn add(&self, chunks: &[DocumentChunk]) -> Result<()> {
        validate_dimensions(chunks)?;

        let mut stored = self
            .chunks
            .write()
            .map_err(|e| Error::Retrieval(format!("Lock error: {}", e)))?;

        if let (Some(existing), Some(incoming)) = (stored.first(), chunks.first()) {
            if existing.embedding.len() != incoming.embedding.len() {
                return Err(Error::Ingestion(format!(
                    "embedding dimension mismatch: collection holds {} dims, batch has {}",
                    existing.embedding.len(),
                    incoming.embedding.len()
                )));
            }
        }

        stored.extend_from_slice(chunks);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let stored = self
            .chunks
            .read()
            .map_err(|e| Error::Retrieval(format!("Lock error: {}", e)))?;

        let mut results: Vec<ScoredChunk> = stored
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                distance: Self::cosine_distance(vector, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        let stored = self
            .chunks
            .read()
            .map_err(|e| Error::Retrieval(format!("Lock error: {}", e)))?;
        Ok(stored.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> DocumentChunk {
        DocumentChunk {
            id: id.to_string(),
            text: format!("text for {}", id),
            source_locator: "page_1".to_string(),
            embedding,
        }
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let store = MemoryStore::new();
        store
            .add(&[chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.0, 1.0])])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_orders_by_ascending_distance() {
        let store = MemoryStore::new();
        store
            .add(&[
                chunk("far", vec![0.0, 1.0]),
                chunk("near", vec![1.0, 0.0]),
                chunk("mid", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.query(&[1.0, 0.0], 3).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(results[0].distance <= results[1].distance);
        assert!(results[1].distance <= results[2].distance);
    }

    #[tokio::test]
    async fn test_query_with_k_beyond_count_returns_fewer() {
        let store = MemoryStore::new();
        store.add(&[chunk("only", vec![1.0, 0.0])]).await.unwrap();

        let results = store.query(&[1.0, 0.0], 50).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_query_is_empty_not_error() {
        let store = MemoryStore::new();
        let results = store.query(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let store = MemoryStore::new();
        store.add(&[chunk("a", vec![1.0, 0.0])]).await.unwrap();

        let err = store
            .add(&[chunk("b", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));

        let err = store
            .add(&[chunk("c", vec![1.0, 0.0]), chunk("d", vec![1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }

    #[tokio::test]
    async fn test_equal_distances_keep_insertion_order() {
        let store = MemoryStore::new();
        store
            .add(&[
                chunk("first", vec![1.0, 0.0]),
                chunk("second", vec![2.0, 0.0]),
            ])
            .await
            .unwrap();

        // Cosine distance ignores magnitude, both are 0.0 from the query.
        let results = store.query(&[1.0, 0.0], 2).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
