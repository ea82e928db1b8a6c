//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding providers (text to fixed-length vector)
///
/// Implementations own their provider-specific policies: input truncation,
/// response-shape normalization, and wrapping transport failures into
/// [`Error::Embedding`](crate::Error::Embedding). Empty or whitespace-only
/// input yields no vector and is an error.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a piece of text into a fixed-dimension vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
