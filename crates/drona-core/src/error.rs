//! Error types for the Drona alumni assistant

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Drona system
///
/// Provider-level failures are wrapped into these variants with the original
/// message preserved; callers never see provider-specific error types.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
