pub mod agent;
pub mod chain;
pub mod cli;
pub mod client;
pub mod config;
pub mod history;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod retriever;
pub mod server;

use agent::AnswerAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Corpus Path: {}", args.corpus_path);
    info!("Force Reingest: {}", args.reingest);
    info!("Qdrant URL: {}", args.qdrant_url);
    info!("Qdrant Collection: {}", args.collection);
    info!("Vector Dimension: {}", args.dimension);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Embedding LLM Type: {}", args.embedding_llm_type);
    info!("Prompts Path: {}", args.prompts_path);
    info!("Retrieval Limit: {}", args.retrieval_limit);
    info!("History Limit: {}", args.history_limit);
    info!("-------------------------");

    let agent = Arc::new(AnswerAgent::new(args.clone()).await?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent);
    server.run().await?;

    Ok(())
}
