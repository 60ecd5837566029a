use async_trait::async_trait;
use log::info;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::prompt::{ self, PromptConfig };
use crate::history::{ format_history_for_prompt, HistoryStore };
use crate::llm::chat::ChatClient;
use crate::llm::embedding::EmbeddingClient;
use crate::models::chat::Role;
use crate::retriever::{ Retriever, ScoredDocument };

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Embedding failed: {0}")]
    Embedding(String),
    #[error("Retrieval failed: {0}")]
    Retrieval(String),
    #[error("Completion failed: {0}")]
    Completion(String),
    #[error("History access failed: {0}")]
    History(String),
}

/// The narrow interface the relay depends on: one question in, one
/// answer out, memory keyed by the caller's session id.
#[async_trait]
pub trait AnswerChain: Send + Sync {
    async fn invoke(&self, input: &str, session_id: &str) -> Result<String, ChainError>;
}

pub struct RagChain {
    chat_client: Arc<dyn ChatClient>,
    embedding_client: Arc<dyn EmbeddingClient>,
    retriever: Arc<dyn Retriever>,
    history_store: Arc<dyn HistoryStore>,
    prompt_config: Arc<PromptConfig>,
    retrieval_limit: usize,
    history_limit: usize,
}

impl RagChain {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        embedding_client: Arc<dyn EmbeddingClient>,
        retriever: Arc<dyn Retriever>,
        history_store: Arc<dyn HistoryStore>,
        prompt_config: Arc<PromptConfig>,
        retrieval_limit: usize,
        history_limit: usize
    ) -> Self {
        Self {
            chat_client,
            embedding_client,
            retriever,
            history_store,
            prompt_config,
            retrieval_limit,
            history_limit,
        }
    }

    fn format_documents_for_prompt(hits: &[ScoredDocument]) -> String {
        if hits.is_empty() {
            return "No relevant documents found.".to_string();
        }

        let mut docs_text = String::from("Context documents:\n");
        for hit in hits {
            docs_text.push_str(&format!("(Score: {:.4})\n", hit.score));
            if let Some(doc_obj) = hit.document.as_object() {
                for (key, value) in doc_obj {
                    if key == "vector" {
                        continue;
                    }
                    let value_str = match value {
                        Value::String(s) => s.clone(),
                        _ => value.to_string(),
                    };
                    docs_text.push_str(&format!("  - {}: {}\n", key, value_str));
                }
            }
            docs_text.push('\n');
        }
        docs_text
    }
}

#[async_trait]
impl AnswerChain for RagChain {
    async fn invoke(&self, input: &str, session_id: &str) -> Result<String, ChainError> {
        let conversation = self.history_store
            .get_conversation(session_id, self.history_limit).await
            .map_err(|e| ChainError::History(e.to_string()))?;
        let history_text = format_history_for_prompt(&conversation);

        let embed_resp = self.embedding_client
            .embed(input).await
            .map_err(|e| ChainError::Embedding(e.to_string()))?;

        let hits = self.retriever
            .retrieve(&embed_resp.embedding, self.retrieval_limit).await
            .map_err(|e| ChainError::Retrieval(e.to_string()))?;
        info!("Retrieved {} documents for session {}", hits.len(), session_id);

        let docs_text = Self::format_documents_for_prompt(&hits);
        let final_prompt = prompt::get_answer_prompt(
            &self.prompt_config,
            &docs_text,
            &history_text,
            input
        );

        let answer_resp = self.chat_client
            .complete(&final_prompt).await
            .map_err(|e| ChainError::Completion(e.to_string()))?;

        self.history_store
            .add_message(session_id, Role::User, input).await
            .map_err(|e| ChainError::History(e.to_string()))?;
        self.history_store
            .add_message(session_id, Role::Assistant, &answer_resp.response).await
            .map_err(|e| ChainError::History(e.to_string()))?;

        Ok(answer_resp.response)
    }
}
