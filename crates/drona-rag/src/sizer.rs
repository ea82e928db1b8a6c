//! Result sizing from question keywords
//!
//! A deliberately coarse, case-insensitive substring and token heuristic,
//! not an NLU system. The trigger phrases are load-bearing and must not be
//! tightened to word boundaries: "count" fires inside "counting", and a
//! question like "I have 3 kids" resolves to k = 3.

use drona_core::QueryIntent;

/// A question resolved against the current corpus size. Ephemeral,
/// constructed per request, never persisted.
#[derive(Debug, Clone)]
pub struct Query {
    pub raw_text: String,
    pub intent: QueryIntent,
    pub resolved_k: usize,
}

impl Query {
    /// Classify a question and resolve how many results to request.
    pub fn parse(question: &str, default_k: usize, total_docs: usize) -> Self {
        let intent = detect_intent(question);
        let resolved_k = match intent {
            QueryIntent::Count | QueryIntent::All => total_docs,
            QueryIntent::Sized(n) => n,
            QueryIntent::Default => default_k,
        };

        Self {
            raw_text: question.to_string(),
            intent,
            resolved_k,
        }
    }
}

/// Classify a question. First matching rule wins.
///
/// Count is checked first: a count question short-circuits the whole
/// retrieval path, so it must win even when the question also asks for
/// everything ("count of all alumni"). Both rules resolve to the full
/// corpus size either way.
pub fn detect_intent(question: &str) -> QueryIntent {
    let lower = question.to_lowercase();

    if lower.contains("count") || lower.contains("total") || lower.contains("how many") {
        return QueryIntent::Count;
    }

    if lower.contains("all alumni") || lower.contains("all details") {
        return QueryIntent::All;
    }

    for token in question.split_whitespace() {
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = token.parse::<usize>() {
                return QueryIntent::Sized(n);
            }
        }
    }

    QueryIntent::Default
}

/// Decide how many matches to request for a question.
pub fn resolve(question: &str, default_k: usize, total_docs: usize) -> usize {
    Query::parse(question, default_k, total_docs).resolved_k
}
