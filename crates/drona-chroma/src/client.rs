//! Chroma Cloud REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use drona_core::{DocumentChunk, Error, Result, ScoredChunk, VectorStore};

use crate::config::ChromaConfig;

/// Vector store backed by a Chroma Cloud collection
///
/// `connect` resolves (or creates) the configured collection and must be
/// called before the store is shared; after that every operation is
/// read-only on the handle and safe to call concurrently.
pub struct ChromaStore {
    config: ChromaConfig,
    client: Client,
    collection_id: Option<String>,
}

impl ChromaStore {
    /// Create a new Chroma store from configuration
    pub fn new(config: ChromaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        Ok(Self {
            config,
            client,
            collection_id: None,
        })
    }

    /// Create a new Chroma store from environment variables
    pub fn from_env() -> Result<Self> {
        let config = ChromaConfig::from_env()?;
        Self::new(config)
    }

    fn database_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}",
            self.config.api_url, self.config.tenant, self.config.database
        )
    }

    fn collection_id(&self) -> Result<&str> {
        self.collection_id
            .as_deref()
            .ok_or_else(|| Error::Retrieval("not connected, call connect() first".to_string()))
    }

    /// Resolve the configured collection, creating it when missing.
    pub async fn connect(&mut self) -> Result<()> {
        let url = format!("{}/collections", self.database_url());

        let response = self
            .client
            .post(&url)
            .header("X-Chroma-Token", &self.config.api_key)
            .json(&json!({
                "name": self.config.collection,
                "get_or_create": true,
            }))
            .send()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Retrieval(format!(
                "failed to open collection '{}': status {}: {}",
                self.config.collection, status, error_text
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Retrieval("collection response missing id".to_string()))?;

        self.collection_id = Some(id.to_string());
        Ok(())
    }

    /// Drop the collection and recreate it empty (wholesale replacement).
    pub async fn replace_collection(&mut self) -> Result<()> {
        let url = format!(
            "{}/collections/{}",
            self.database_url(),
            self.config.collection
        );

        let response = self
            .client
            .delete(&url)
            .header("X-Chroma-Token", &self.config.api_key)
            .send()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        // A missing collection is fine, replacement starts from empty either way.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(Error::Retrieval(format!(
                "failed to delete collection '{}': status {}",
                self.config.collection,
                response.status()
            )));
        }

        self.collection_id = None;
        self.connect().await
    }

    async fn post_collection(&self, operation: &str, body: &Value) -> Result<Value> {
        let url = format!(
            "{}/collections/{}/{}",
            self.database_url(),
            self.collection_id()?,
            operation
        );

        let response = self
            .client
            .post(&url)
            .header("X-Chroma-Token", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Retrieval(format!(
                "{} request failed with status {}: {}",
                operation, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))
    }
}

/// Reject a batch whose embedding dimensions disagree before submission.
/// A mismatched dimension is an ingestion error, not silent corruption.
pub(crate) fn validate_dimensions(chunks: &[DocumentChunk]) -> Result<()> {
    let Some(first) = chunks.first() else {
        return Ok(());
    };
    let expected = first.embedding.len();
    if expected == 0 {
        return Err(Error::Ingestion(format!(
            "chunk '{}' has an empty embedding",
            first.id
        )));
    }
    for chunk in chunks {
        if chunk.embedding.len() != expected {
            return Err(Error::Ingestion(format!(
                "embedding dimension mismatch: chunk '{}' has {} dims, expected {}",
                chunk.id,
                chunk.embedding.len(),
                expected
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn add(&self, chunks: &[DocumentChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        validate_dimensions(chunks)?;

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let documents: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings: Vec<&[f32]> = chunks.iter().map(|c| c.embedding.as_slice()).collect();
        let metadatas: Vec<Value> = chunks
            .iter()
            .map(|c| json!({ "source": c.source_locator }))
            .collect();

        self.post_collection(
            "add",
            &json!({
                "ids": ids,
                "documents": documents,
                "embeddings": embeddings,
                "metadatas": metadatas,
            }),
        )
        .await?;

        Ok(())
    }

    /// Results come back in Chroma's ascending-distance order and are passed
    /// through untouched. Retrieved chunks do not carry their embeddings;
    /// the query includes only documents, metadatas, and distances.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let value = self
            .post_collection(
                "query",
                &json!({
                    "query_embeddings": [vector],
                    "n_results": k,
                    "include": ["documents", "metadatas", "distances"],
                }),
            )
            .await?;

        // Per-query nested lists; we issue exactly one query.
        let ids = first_query_list(&value, "ids");
        let documents = first_query_list(&value, "documents");
        let metadatas = first_query_list(&value, "metadatas");
        let distances = first_query_list(&value, "distances");

        let mut results = Vec::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            let id = id
                .as_str()
                .ok_or_else(|| Error::Retrieval("query response id is not a string".to_string()))?;
            let text = documents
                .get(index)
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let source_locator = metadatas
                .get(index)
                .and_then(|m| m.get("source"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let distance = distances
                .get(index)
                .and_then(|v| v.as_f64())
                .unwrap_or_default() as f32;

            results.push(ScoredChunk {
                chunk: DocumentChunk {
                    id: id.to_string(),
                    text: text.to_string(),
                    source_locator: source_locator.to_string(),
                    embedding: Vec::new(),
                },
                distance,
            });
        }

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        let url = format!(
            "{}/collections/{}/count",
            self.database_url(),
            self.collection_id()?
        );

        let response = self
            .client
            .get(&url)
            .header("X-Chroma-Token", &self.config.api_key)
            .send()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Retrieval(format!(
                "count request failed with status {}",
                response.status()
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| Error::Retrieval("count response is not a number".to_string()))
    }
}

fn first_query_list<'a>(value: &'a Value, field: &str) -> Vec<&'a Value> {
    value
        .get(field)
        .and_then(Value::as_array)
        .and_then(|lists| lists.first())
        .and_then(Value::as_array)
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}
