use serde::{ Serialize, Deserialize };
use std::fmt;

/// Who authored a transcript message. Serialized lowercase on the wire
/// and in prompt history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST /fetch`. `session_id` is optional so the minimal
/// `{"user_input": ...}` form keeps parsing; the server mints a
/// per-request id when it is absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchRequest {
    pub user_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response body of `POST /fetch`. The field carries a single answer
/// string; the plural name is kept for wire compatibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    pub messages: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn fetch_request_parses_without_session_id() {
        let req: FetchRequest = serde_json::from_str(r#"{"user_input":"hi"}"#).unwrap();
        assert_eq!(req.user_input, "hi");
        assert!(req.session_id.is_none());
    }

    #[test]
    fn fetch_request_parses_with_session_id() {
        let req: FetchRequest = serde_json
            ::from_str(r#"{"user_input":"hi","session_id":"abc"}"#)
            .unwrap();
        assert_eq!(req.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn fetch_response_field_is_named_messages() {
        let body = serde_json::to_string(&(FetchResponse { messages: "ok".into() })).unwrap();
        assert_eq!(body, r#"{"messages":"ok"}"#);
    }
}
