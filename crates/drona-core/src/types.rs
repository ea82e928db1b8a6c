//! Data model shared across the Drona pipelines

use serde::{Deserialize, Serialize};

/// A bounded unit of source text stored with exactly one embedding.
///
/// Created during ingestion; immutable once stored. The id is a
/// deterministic function of (page index, chunk index) so re-ingesting the
/// same source produces the same id sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub text: String,
    /// Where the text came from, e.g. "page_12".
    pub source_locator: String,
    pub embedding: Vec<f32>,
}

/// A chunk returned from a vector search, paired with its distance.
///
/// Lower distance means more similar under the store's chosen metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub distance: f32,
}

/// Coarse intent of a question, derived from keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryIntent {
    /// The user asked for the corpus size; answered without retrieval.
    Count,
    /// The user asked for everything.
    All,
    /// The question named an explicit result count.
    Sized(usize),
    Default,
}

/// The outcome of one query pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Retrieved chunks in rank order; empty for count questions.
    pub grounding_chunks: Vec<DocumentChunk>,
    pub total_corpus_size: usize,
}

/// The outcome of one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    pub chunks_added: usize,
}
