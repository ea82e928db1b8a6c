//! Grounding-context assembly

use drona_core::DocumentChunk;

/// Safety budget for the assembled context window, in characters.
pub const MAX_CONTEXT_CHARS: usize = 18_000;

/// Placeholder supplied to the generative model when retrieval found
/// nothing, so the prompt can state that explicitly.
pub const NO_CONTEXT_SENTINEL: &str = "(no relevant context found)";

/// Visible separator between chunks, so a reader can tell chunk boundaries
/// apart from prose.
const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Join retrieved chunks in rank order and trim to the safety budget.
///
/// The cut is a hard character cut; no attempt is made to keep whole chunks
/// past the budget. Empty input yields [`NO_CONTEXT_SENTINEL`], never an
/// empty string.
pub fn assemble(chunks: &[DocumentChunk], max_chars: usize) -> String {
    if chunks.is_empty() {
        return NO_CONTEXT_SENTINEL.to_string();
    }

    let joined = chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);

    match joined.char_indices().nth(max_chars) {
        Some((index, _)) => joined[..index].to_string(),
        None => joined,
    }
}
