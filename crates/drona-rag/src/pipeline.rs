//! Query pipeline orchestration

use std::sync::Arc;

use tracing::debug;

use drona_core::{Answer, DocumentChunk, Embedder, QueryIntent, Result, TextGenerator, VectorStore};

use crate::answer::AnswerGenerator;
use crate::context::{MAX_CONTEXT_CHARS, assemble};
use crate::sizer::Query;

/// How many matches to retrieve when the question names no size.
pub const DEFAULT_K: usize = 3;

/// Per-request query orchestrator
///
/// Holds only shared provider handles; each `answer` call is independently
/// schedulable, carries no per-request state on the pipeline, and holds no
/// lock across a provider call. Retries are the caller's concern.
pub struct QueryPipeline<V, E, G> {
    store: Arc<V>,
    embedder: Arc<E>,
    generator: AnswerGenerator<G>,
    default_k: usize,
    max_context_chars: usize,
}

impl<V, E, G> QueryPipeline<V, E, G>
where
    V: VectorStore,
    E: Embedder,
    G: TextGenerator,
{
    /// Create a new query pipeline over shared provider handles
    pub fn new(store: Arc<V>, embedder: Arc<E>, generator: Arc<G>) -> Self {
        Self {
            store,
            embedder,
            generator: AnswerGenerator::new(generator),
            default_k: DEFAULT_K,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }

    /// Override the default result count
    pub fn with_default_k(mut self, default_k: usize) -> Self {
        self.default_k = default_k;
        self
    }

    /// Answer a question against the corpus.
    ///
    /// Count questions short-circuit to the corpus size without touching the
    /// embedder or the index, so numeric questions about corpus size never
    /// depend on embedding or search accuracy. Everything else runs
    /// embed, retrieve, assemble, generate; the first failing step fails the
    /// whole request with its underlying cause.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let total_docs = self.store.count().await?;
        let query = Query::parse(question, self.default_k, total_docs);
        debug!(intent = ?query.intent, resolved_k = query.resolved_k, total_docs, "resolved query");

        if query.intent == QueryIntent::Count {
            return Ok(Answer {
                text: format!("There are {} alumni in the database.", total_docs),
                grounding_chunks: Vec::new(),
                total_corpus_size: total_docs,
            });
        }

        let vector = self.embedder.embed(question).await?;

        // Requesting more matches than exist is satisfied with fewer.
        let k = query.resolved_k.min(total_docs);
        let results = self.store.query(&vector, k).await?;
        let chunks: Vec<DocumentChunk> = results.into_iter().map(|r| r.chunk).collect();

        let context = assemble(&chunks, self.max_context_chars);
        let text = self.generator.generate(&context, question).await?;

        Ok(Answer {
            text,
            grounding_chunks: chunks,
            total_corpus_size: total_docs,
        })
    }
}
