//! Generative text provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for generative text providers (prompt to text)
///
/// Transport failures surface as [`Error::Generation`](crate::Error::Generation);
/// unrecognized response shapes degrade to a stringified rendering of the raw
/// response rather than an error.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}
