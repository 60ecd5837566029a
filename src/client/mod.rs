use log::info;
use reqwest::Client as HttpClient;
use std::error::Error;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };
use uuid::Uuid;

use crate::cli::ClientArgs;
use crate::models::chat::{ ChatMessage, FetchRequest, FetchResponse, Role };

/// Shown as the assistant reply for any non-200 status or transport
/// failure. Exact wording is part of the client contract.
pub const ERROR_REPLY: &str = "Some error occured";

/// One user's conversation with the answer service: the transcript
/// plus the HTTP plumbing for a turn. Transcript state lives only as
/// long as the session.
pub struct ChatSession {
    http: HttpClient,
    fetch_url: String,
    session_id: String,
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(server_url: &str, session_id: Option<String>) -> Self {
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        info!("Chat session id: {}", session_id);
        Self {
            http: HttpClient::new(),
            fetch_url: format!("{}/fetch", server_url.trim_end_matches('/')),
            session_id,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Appends the user message, performs the call, then appends the
    /// assistant reply (or the fixed error string). Failures never
    /// escape to the caller.
    pub async fn send(&mut self, user_input: &str) {
        self.push(Role::User, user_input);

        let request = FetchRequest {
            user_input: user_input.to_string(),
            session_id: Some(self.session_id.clone()),
        };

        let reply = match self.http.post(&self.fetch_url).json(&request).send().await {
            Ok(resp) if resp.status().is_success() => {
                match resp.json::<FetchResponse>().await {
                    Ok(body) => body.messages,
                    Err(_) => ERROR_REPLY.to_string(),
                }
            }
            _ => ERROR_REPLY.to_string(),
        };

        self.push(Role::Assistant, &reply);
    }

    fn push(&mut self, role: Role, content: &str) {
        self.transcript.push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        });
    }

    pub fn render_transcript(&self) -> String {
        let mut out = String::new();
        for msg in &self.transcript {
            let label = match msg.role {
                Role::User => "you",
                Role::Assistant => "assistant",
            };
            out.push_str(&format!("[{}] {}\n", label, msg.content));
        }
        out
    }
}

/// Terminal chat loop: read a line, run the turn, re-render the whole
/// transcript. Ends on EOF or an empty line.
pub async fn run_chat_loop(args: ClientArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut session = ChatSession::new(&args.server_url, args.session_id.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    stdout.write_all(b"Type your message (empty line to quit)\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        session.send(input).await;

        stdout.write_all(b"\n").await?;
        stdout.write_all(session.render_transcript().as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{ routing::post, Json, Router };
    use axum::http::StatusCode;
    use std::net::SocketAddr;

    async fn spawn_stub(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });
        addr
    }

    async fn spawn_answering_stub(answer: &'static str) -> SocketAddr {
        spawn_stub(
            Router::new().route(
                "/fetch",
                post(move |Json(req): Json<FetchRequest>| async move {
                    assert!(!req.user_input.is_empty());
                    assert!(req.session_id.is_some());
                    Json(FetchResponse { messages: answer.to_string() })
                })
            )
        ).await
    }

    async fn spawn_failing_stub() -> SocketAddr {
        spawn_stub(
            Router::new().route(
                "/fetch",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR })
            )
        ).await
    }

    #[tokio::test]
    async fn answer_lands_as_last_assistant_message() {
        let addr = spawn_answering_stub("30-day returns.").await;
        let mut session = ChatSession::new(&format!("http://{}", addr), None);

        session.send("What is the return policy?").await;

        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "30-day returns.");
    }

    #[tokio::test]
    async fn transcript_alternates_and_doubles_per_turn() {
        let addr = spawn_answering_stub("ok").await;
        let mut session = ChatSession::new(&format!("http://{}", addr), None);

        for i in 0..3 {
            session.send(&format!("turn {}", i)).await;
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 6);
        for (i, msg) in transcript.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(msg.role, expected);
        }
        assert_eq!(transcript[4].content, "turn 2");
    }

    #[tokio::test]
    async fn server_error_renders_fixed_placeholder() {
        let addr = spawn_failing_stub().await;
        let mut session = ChatSession::new(&format!("http://{}", addr), None);

        session.send("hi").await;

        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Some error occured");
    }

    #[tokio::test]
    async fn unreachable_server_renders_fixed_placeholder() {
        // Grab a free port, then drop the listener so nothing answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut session = ChatSession::new(&format!("http://{}", addr), None);

        session.send("hi").await;

        assert_eq!(session.transcript().last().unwrap().content, ERROR_REPLY);
    }

    #[tokio::test]
    async fn explicit_session_id_is_sent_through() {
        let addr = spawn_stub(
            Router::new().route(
                "/fetch",
                post(|Json(req): Json<FetchRequest>| async move {
                    Json(FetchResponse {
                        messages: req.session_id.unwrap_or_default(),
                    })
                })
            )
        ).await;
        let mut session = ChatSession::new(
            &format!("http://{}", addr),
            Some("fixed-id".to_string())
        );

        session.send("hi").await;

        assert_eq!(session.transcript().last().unwrap().content, "fixed-id");
    }

    #[tokio::test]
    async fn render_shows_both_sides_in_order() {
        let addr = spawn_answering_stub("hello there").await;
        let mut session = ChatSession::new(&format!("http://{}", addr), None);

        session.send("hi").await;

        let rendered = session.render_transcript();
        assert_eq!(rendered, "[you] hi\n[assistant] hello there\n");
    }
}
