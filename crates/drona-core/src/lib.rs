//! Core traits and types for the Drona alumni assistant
//!
//! This crate defines the fundamental traits and types used across the Drona
//! system. It provides capability-facing interfaces for the embedding
//! provider, the vector store, and the generative text provider, making the
//! pipelines test-friendly and provider-agnostic.

pub mod embedder;
pub mod error;
pub mod generator;
pub mod types;
pub mod vector_store;

pub use embedder::Embedder;
pub use error::{Error, Result};
pub use generator::TextGenerator;
pub use types::{Answer, DocumentChunk, IngestionReport, QueryIntent, ScoredChunk};
pub use vector_store::VectorStore;
