use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ChatClient, CompletionResponse};
use crate::llm::LlmConfig;

pub struct OllamaChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

impl OllamaChatClient {
    pub fn new(
        base_url: Option<String>,
        model: Option<String>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_url = base_url.unwrap_or_else(|| "http://localhost:11434".to_string());
        let chat_model = model.unwrap_or_else(|| "llama3".to_string());

        Ok(Self {
            http: HttpClient::new(),
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(config.base_url.clone(), config.completion_model.clone())
    }
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let req = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let resp = self.http.post(&url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OllamaChatResponse>()
            .await?;

        Ok(CompletionResponse { response: resp.message.content })
    }
}
