//! Query and ingestion pipelines for the Drona alumni assistant
//!
//! The query side turns a natural-language question into a grounded answer:
//! sizing the retrieval, searching the vector store, assembling a bounded
//! context window, and prompting the generative provider. The ingestion side
//! turns a PDF source into embedded chunks in the store.

mod answer;
mod context;
mod ingest;
mod pipeline;
mod sizer;


pub use answer::AnswerGenerator;
pub use context::{MAX_CONTEXT_CHARS, NO_CONTEXT_SENTINEL, assemble};
pub use ingest::{CHUNK_CHARS, IngestionPipeline, PageText};
pub use pipeline::{DEFAULT_K, QueryPipeline};
pub use sizer::{Query, detect_intent, resolve};

// Re-export core types for convenience
pub use drona_core::{
    Answer, DocumentChunk, Embedder, Error, IngestionReport, QueryIntent, Result, ScoredChunk,
    TextGenerator, VectorStore,
};
