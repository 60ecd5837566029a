mod memory;
pub use memory::MemoryHistoryStore;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::models::chat::{ Conversation, Role };

/// Per-session conversational memory used by the retrieval chain. The
/// client keeps its own transcript; this store only feeds the prompt.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns up to `limit` most recent messages, oldest first.
    async fn get_conversation(
        &self,
        session_id: &str,
        limit: usize
    ) -> Result<Conversation, Box<dyn Error + Send + Sync>>;
}

pub fn initialize_history_store() -> Arc<dyn HistoryStore> {
    info!("Chat history will be stored in: memory");
    Arc::new(MemoryHistoryStore::new())
}

pub fn format_history_for_prompt(conversation: &Conversation) -> String {
    if conversation.messages.is_empty() {
        return String::new();
    }
    let mut result = String::from("Previous conversation:\n");
    for msg in &conversation.messages {
        let role_display = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };

        result.push_str(&format!("{}: {}\n", role_display, msg.content));
    }

    result
}
