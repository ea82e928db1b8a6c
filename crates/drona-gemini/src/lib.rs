//! Gemini provider integration for Drona
//!
//! Wraps the Gemini generative-language API behind the core
//! [`Embedder`](drona_core::Embedder) and
//! [`TextGenerator`](drona_core::TextGenerator) traits, normalizing the
//! provider's heterogeneous response shapes in one place.

mod client;
mod config;


pub use client::{GeminiClient, MAX_EMBED_CHARS, extract_embedding, extract_text};
pub use config::GeminiConfig;

// Re-export core traits for convenience
pub use drona_core::{Embedder, Error, Result, TextGenerator};
