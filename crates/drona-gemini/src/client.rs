//! Gemini API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use drona_core::{Embedder, Error, Result, TextGenerator};

use crate::config::GeminiConfig;

/// Input longer than this is truncated before embedding. Lossy but
/// deterministic; not an error.
pub const MAX_EMBED_CHARS: usize = 2_000;

/// Gemini API client for embeddings and text generation
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Model constants
    pub const EMBED_MODEL: &'static str = "models/text-embedding-004";
    pub const TEXT_MODEL: &'static str = "gemini-2.5-flash";

    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Embed a piece of text, truncating oversized input first.
    pub async fn embed_content(&self, text: &str) -> Result<Vec<f32>> {
        let snippet = truncate_chars(text, MAX_EMBED_CHARS);
        if snippet.trim().is_empty() {
            return Err(Error::Embedding("empty input, nothing to embed".to_string()));
        }

        let url = format!(
            "{}/{}:embedContent?key={}",
            self.config.api_url, self.config.embed_model, self.config.api_key
        );

        let request_body = json!({
            "model": self.config.embed_model,
            "content": { "parts": [{ "text": snippet }] },
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        extract_embedding(&value)
            .ok_or_else(|| Error::Embedding("unexpected response shape".to_string()))
    }

    /// Generate a completion for the given prompt.
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.api_url, self.config.text_model, self.config.api_key
        );

        let request_body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Generation(format!(
                "generation request failed with status {}: {}",
                status, error_text
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        Ok(extract_text(&value))
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_content(text).await
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

/// One way a provider response might carry an embedding vector
type EmbeddingShape = fn(&Value) -> Option<Vec<f32>>;

/// Known embedding response shapes, tried in order. Isolates
/// provider-version drift to this one list.
const EMBEDDING_SHAPES: &[EmbeddingShape] = &[
    bare_embedding_field,
    first_record_values,
    embedding_values_field,
];

/// Extract an embedding vector from a provider response, trying every known
/// shape in order. Returns `None` when no shape matches.
pub fn extract_embedding(value: &Value) -> Option<Vec<f32>> {
    EMBEDDING_SHAPES.iter().find_map(|shape| shape(value))
}

/// `{"embedding": [0.1, 0.2, ...]}`
fn bare_embedding_field(value: &Value) -> Option<Vec<f32>> {
    numeric_vector(value.get("embedding")?)
}

/// `{"embeddings": [{"values": [0.1, ...]}, ...]}`
fn first_record_values(value: &Value) -> Option<Vec<f32>> {
    numeric_vector(value.get("embeddings")?.as_array()?.first()?.get("values")?)
}

/// `{"embedding": {"values": [0.1, ...]}}`
fn embedding_values_field(value: &Value) -> Option<Vec<f32>> {
    numeric_vector(value.get("embedding")?.get("values")?)
}

fn numeric_vector(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_f64().map(|n| n as f32))
        .collect()
}

/// One way a provider response might carry generated text
type TextShape = fn(&Value) -> Option<String>;

const TEXT_SHAPES: &[TextShape] = &[direct_text_field, candidate_part_text];

/// Extract generated text from a provider response.
///
/// Tries every known shape in order and returns the first non-empty string;
/// when none match, falls back to a string rendering of the raw response
/// rather than failing.
pub fn extract_text(value: &Value) -> String {
    TEXT_SHAPES
        .iter()
        .find_map(|shape| shape(value))
        .unwrap_or_else(|| value.to_string())
}

/// `{"text": "..."}`
fn direct_text_field(value: &Value) -> Option<String> {
    non_empty(value.get("text")?.as_str()?)
}

/// `{"candidates": [{"content": {"parts": [{"text": "..."}]}}]}`
fn candidate_part_text(value: &Value) -> Option<String> {
    non_empty(
        value
            .get("candidates")?
            .as_array()?
            .first()?
            .get("content")?
            .get("parts")?
            .as_array()?
            .first()?
            .get("text")?
            .as_str()?,
    )
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Cut a string to at most `max` characters, on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
