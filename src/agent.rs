use qdrant_client::Qdrant;
use uuid::Uuid;

use crate::chain::{ AnswerChain, ChainError, RagChain };
use crate::cli::Args;
use crate::config::prompt;
use crate::history::initialize_history_store;
use crate::ingest::DocumentIngestor;
use crate::llm::{ parse_llm_type, LlmConfig };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::llm::embedding::{ EmbeddingClient, new_client as new_embedding_client };
use crate::retriever::QdrantRetriever;

use log::info;
use std::error::Error;
use std::sync::Arc;

/// Process-wide answer service: built once at startup, shared
/// read-only for the lifetime of the process.
pub struct AnswerAgent {
    chain: Arc<dyn AnswerChain>,
}

impl AnswerAgent {
    pub async fn new(args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let (chat_client, embedding_client) = Self::initialize_llm_clients(&args)?;

        info!("Connecting to vector store at: {}", args.qdrant_url);
        let qdrant = Arc::new(
            Qdrant::from_url(&args.qdrant_url)
                .api_key(args.qdrant_api_key.clone())
                .build()?
        );

        let ingestor = DocumentIngestor::new(qdrant.clone(), embedding_client.clone(), &args);
        ingestor.ingest(&args.corpus_path, !args.reingest).await?;

        let retriever = Arc::new(QdrantRetriever::new(qdrant, args.collection.clone()));
        let history_store = initialize_history_store();
        let prompt_config = prompt::load_prompts(&args.prompts_path)?;

        let chain = Arc::new(
            RagChain::new(
                chat_client,
                embedding_client,
                retriever,
                history_store,
                prompt_config,
                args.retrieval_limit,
                args.history_limit
            )
        );

        Ok(Self { chain })
    }

    /// Wraps an already built chain; used by the server tests.
    pub fn from_chain(chain: Arc<dyn AnswerChain>) -> Self {
        Self { chain }
    }

    /// Answers one question. A missing session id gets a fresh
    /// per-request id, so callers that omit it never share memory.
    pub async fn answer(
        &self,
        user_input: &str,
        session_id: Option<&str>
    ) -> Result<String, ChainError> {
        let session_id = match session_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        self.chain.invoke(user_input, &session_id).await
    }

    fn initialize_llm_clients(
        args: &Args
    ) -> Result<(Arc<dyn ChatClient>, Arc<dyn EmbeddingClient>), Box<dyn Error + Send + Sync>> {
        let chat_llm_type = parse_llm_type(&args.chat_llm_type)?;
        let chat_api_key = if !args.chat_api_key.is_empty() {
            Some(args.chat_api_key.clone())
        } else {
            None
        };
        let chat_config = LlmConfig {
            llm_type: chat_llm_type,
            base_url: args.chat_base_url.clone(),
            api_key: chat_api_key,
            completion_model: args.chat_model.clone(),
            embedding_model: None,
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={:?}, BaseURL={:?}",
            args.chat_llm_type,
            chat_config.completion_model.as_deref().unwrap_or("adapter default"),
            chat_config.base_url.as_deref().unwrap_or("adapter default")
        );

        let embedding_llm_type = parse_llm_type(&args.embedding_llm_type)?;
        let embedding_api_key = if !args.embedding_api_key.is_empty() {
            Some(args.embedding_api_key.clone())
        } else {
            None
        };
        let embedding_config = LlmConfig {
            llm_type: embedding_llm_type,
            base_url: args.embedding_base_url.clone(),
            api_key: embedding_api_key,
            embedding_model: args.embedding_model.clone(),
            completion_model: None,
        };
        let embedding_client = new_embedding_client(&embedding_config)?;
        info!(
            "Embedding client configured: Type={}, Model={:?}, BaseURL={:?}",
            args.embedding_llm_type,
            embedding_config.embedding_model.as_deref().unwrap_or("adapter default"),
            embedding_config.base_url.as_deref().unwrap_or("adapter default")
        );

        Ok((chat_client, embedding_client))
    }
}
