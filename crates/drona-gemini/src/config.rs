//! Gemini configuration

use std::env;

use serde::{Deserialize, Serialize};

use drona_core::{Error, Result};

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub embed_model: String,
    pub text_model: String,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            Error::Configuration("GEMINI_API_KEY environment variable not found".to_string())
        })?;

        let api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let embed_model =
            env::var("GEMINI_EMBED_MODEL").unwrap_or_else(|_| crate::GeminiClient::EMBED_MODEL.to_string());

        let text_model =
            env::var("GEMINI_TEXT_MODEL").unwrap_or_else(|_| crate::GeminiClient::TEXT_MODEL.to_string());

        Ok(Self {
            api_key,
            api_url,
            embed_model,
            text_model,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embed_model: crate::GeminiClient::EMBED_MODEL.to_string(),
            text_model: crate::GeminiClient::TEXT_MODEL.to_string(),
        }
    }
}
