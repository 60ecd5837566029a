use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the answer service to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    // --- Corpus / Ingestion Args ---
    /// Path to the JSON-lines document corpus to ingest on startup.
    #[arg(long, env = "CORPUS_PATH", default_value = "data/products.jsonl")]
    pub corpus_path: String,

    /// Re-ingest the corpus even when the collection is already populated.
    /// By default an existing non-empty collection is reused as-is.
    #[arg(long, env = "REINGEST", default_value = "false")]
    pub reingest: bool,

    // --- Vector Store Args ---
    /// Qdrant URL endpoint (e.g., http://localhost:6334)
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6334")]
    pub qdrant_url: String,

    /// Optional API key for the Qdrant instance.
    #[arg(long, env = "QDRANT_API_KEY")]
    pub qdrant_api_key: Option<String>,

    /// Qdrant collection name holding the ingested documents.
    #[arg(long, env = "QDRANT_COLLECTION", default_value = "product_docs")]
    pub collection: String,

    /// Vector dimension size
    #[arg(long, env = "VECTOR_DIMENSION", default_value = "768")]
    pub dimension: usize,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (groq, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "groq")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API. Adapters apply their own default if unset.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., llama-3.1-8b-instant, gpt-4o-mini)
    #[arg(long, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    // --- Embedding LLM Provider Args ---
    /// Type of LLM provider for text embedding (openai, ollama)
    #[arg(long, env = "EMBEDDING_LLM_TYPE", default_value = "ollama")]
    pub embedding_llm_type: String,

    /// Base URL for the Embedding LLM provider API. Adapters apply their own default if unset.
    #[arg(long, env = "EMBEDDING_BASE_URL")]
    pub embedding_base_url: Option<String>,

    /// API Key for the Embedding LLM provider.
    #[arg(long, env = "EMBEDDING_API_KEY", default_value = "")]
    pub embedding_api_key: String,

    /// Model name for text embedding (e.g., nomic-embed-text, text-embedding-3-small)
    #[arg(long, env = "EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    // --- Prompt / Retrieval Args ---
    /// Path to the prompt template file. A built-in template is used if the file is missing.
    #[arg(long, env = "PROMPTS_PATH", default_value = "json/prompts.json")]
    pub prompts_path: String,

    /// Number of documents to retrieve per question.
    #[arg(long, env = "RETRIEVAL_LIMIT", default_value = "4")]
    pub retrieval_limit: usize,

    /// Number of prior messages from the session history included in the prompt.
    #[arg(long, env = "HISTORY_LIMIT", default_value = "6")]
    pub history_limit: usize,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal chat client for the answer service", long_about = None)]
pub struct ClientArgs {
    /// Base URL of the answer service.
    #[arg(long, env = "SERVER_URL", default_value = "http://127.0.0.1:8000")]
    pub server_url: String,

    /// Session identifier sent with every request. Generated when unset.
    #[arg(long, env = "SESSION_ID")]
    pub session_id: Option<String>,
}
