//! Chroma configuration

use std::env;

use serde::{Deserialize, Serialize};

use drona_core::{Error, Result};

/// Configuration for the Chroma Cloud client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromaConfig {
    pub api_key: String,
    pub tenant: String,
    pub database: String,
    pub collection: String,
    pub api_url: String,
}

impl ChromaConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("CHROMA_API_KEY").map_err(|_| {
            Error::Configuration("CHROMA_API_KEY environment variable not found".to_string())
        })?;

        let tenant = env::var("CHROMA_TENANT").map_err(|_| {
            Error::Configuration("CHROMA_TENANT environment variable not found".to_string())
        })?;

        let database = env::var("CHROMA_DATABASE").unwrap_or_else(|_| "alumni_rag".to_string());

        let collection =
            env::var("CHROMA_COLLECTION").unwrap_or_else(|_| "alumni_collection".to_string());

        let api_url =
            env::var("CHROMA_API_URL").unwrap_or_else(|_| "https://api.trychroma.com".to_string());

        Ok(Self {
            api_key,
            tenant,
            database,
            collection,
            api_url,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String, tenant: String) -> Self {
        Self {
            api_key,
            tenant,
            database: "alumni_rag".to_string(),
            collection: "alumni_collection".to_string(),
            api_url: "https://api.trychroma.com".to_string(),
        }
    }
}
