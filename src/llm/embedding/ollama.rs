use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ EmbeddingClient, EmbeddingResponse };
use super::super::LlmConfig;

pub struct OllamaEmbeddingClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbeddingClient {
    pub fn new(
        base_url: Option<String>,
        model: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let url = base_url.unwrap_or_else(|| "http://localhost:11434".to_string());
        let embed_model = model.unwrap_or_else(|| "nomic-embed-text".to_string());

        Ok(Self {
            http: HttpClient::new(),
            model: embed_model,
            base_url: url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(config.base_url.clone(), config.embedding_model.clone())
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbeddingClient {
    async fn embed(
        &self,
        text: &str
    ) -> Result<EmbeddingResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/api/embeddings", self.base_url.trim_end_matches('/'));

        let req = OllamaEmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OllamaEmbedResponse>()
            .await?;

        if resp.embedding.is_empty() {
            return Err("Ollama embedding generation returned no results".into());
        }

        Ok(EmbeddingResponse { embedding: resp.embedding })
    }
}
