//! Vector store implementations for Drona
//!
//! [`ChromaStore`] talks to a Chroma Cloud collection over its REST API;
//! [`MemoryStore`] is an in-memory cosine-distance store used by tests and
//! offline runs. Both implement the core
//! [`VectorStore`](drona_core::VectorStore) contract.

mod client;
mod config;
mod memory;

pub use client::ChromaStore;
pub use config::ChromaConfig;
pub use memory::MemoryStore;

// Re-export core types for convenience
pub use drona_core::{DocumentChunk, Error, Result, ScoredChunk, VectorStore};
