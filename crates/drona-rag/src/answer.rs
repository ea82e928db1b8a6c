//! Grounded answer generation

use std::sync::Arc;

use drona_core::{Result, TextGenerator};

/// Wraps a generative provider behind a fixed grounding prompt.
///
/// The prompt frames the assistant, supplies the context block (or the
/// no-context sentinel) and the question, and instructs the model to answer
/// only from the supplied data. Response-shape normalization is the
/// provider client's concern.
pub struct AnswerGenerator<G> {
    provider: Arc<G>,
}

impl<G: TextGenerator> AnswerGenerator<G> {
    /// Create a new answer generator over a provider handle
    pub fn new(provider: Arc<G>) -> Self {
        Self { provider }
    }

    /// Build the fixed grounding prompt.
    pub fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "You are Drona AI, a helpful assistant that answers from alumni data.\n\
             Answer only from the supplied context. Do not fabricate data that is \
             not present in the context.\n\n\
             Context:\n{}\n\n\
             Question:\n{}\n\n\
             Answer clearly and concisely based only on the data.",
            context, question
        )
    }

    /// Generate an answer grounded in the supplied context.
    pub async fn generate(&self, context: &str, question: &str) -> Result<String> {
        let prompt = Self::build_prompt(context, question);
        self.provider.generate(&prompt).await
    }
}
