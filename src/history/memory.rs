use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::error::Error;
use tokio::sync::RwLock;

use super::HistoryStore;
use crate::models::chat::{ ChatMessage, Conversation, Role };

/// In-process history keyed by session id. Sessions live for the
/// lifetime of the server process.
pub struct MemoryHistoryStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn add_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_id.to_string()).or_default().push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp(),
        });
        Ok(())
    }

    async fn get_conversation(
        &self,
        session_id: &str,
        limit: usize
    ) -> Result<Conversation, Box<dyn Error + Send + Sync>> {
        let sessions = self.sessions.read().await;
        let messages = match sessions.get(session_id) {
            Some(all) => {
                let start = all.len().saturating_sub(limit);
                all[start..].to_vec()
            }
            None => Vec::new(),
        };

        Ok(Conversation {
            id: session_id.to_string(),
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_is_empty() {
        let store = MemoryHistoryStore::new();
        let conversation = store.get_conversation("nobody", 10).await.unwrap();
        assert!(conversation.messages.is_empty());
    }

    #[tokio::test]
    async fn messages_come_back_oldest_first() {
        let store = MemoryHistoryStore::new();
        store.add_message("s1", Role::User, "first").await.unwrap();
        store.add_message("s1", Role::Assistant, "second").await.unwrap();

        let conversation = store.get_conversation("s1", 10).await.unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].content, "first");
        assert_eq!(conversation.messages[1].content, "second");
    }

    #[tokio::test]
    async fn limit_keeps_most_recent_messages() {
        let store = MemoryHistoryStore::new();
        for i in 0..5 {
            store.add_message("s1", Role::User, &format!("m{}", i)).await.unwrap();
        }

        let conversation = store.get_conversation("s1", 2).await.unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].content, "m3");
        assert_eq!(conversation.messages[1].content, "m4");
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = MemoryHistoryStore::new();
        store.add_message("a", Role::User, "for a").await.unwrap();
        store.add_message("b", Role::User, "for b").await.unwrap();

        let a = store.get_conversation("a", 10).await.unwrap();
        assert_eq!(a.messages.len(), 1);
        assert_eq!(a.messages[0].content, "for a");
    }
}
