use crate::agent::AnswerAgent;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::post,
    Router,
    extract::State,
    http::StatusCode,
    Json,
};
use tower_http::cors::{Any, CorsLayer};
use log::{info, error};

use crate::models::chat::{ FetchRequest, FetchResponse };

#[derive(Clone)]
struct AppState {
    agent: Arc<AnswerAgent>,
}

pub fn router(agent: Arc<AnswerAgent>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/fetch", post(fetch_handler))
        .layer(cors)
        .with_state(AppState { agent })
}

pub async fn start_http_server(
    addr: &str,
    agent: Arc<AnswerAgent>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(agent);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Chain failures surface as a bare 500 with no custom payload.
async fn fetch_handler(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<FetchResponse>, StatusCode> {
    match state.agent.answer(&req.user_input, req.session_id.as_deref()).await {
        Ok(answer) => Ok(Json(FetchResponse { messages: answer })),
        Err(e) => {
            error!("Chain invocation failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ AnswerChain, ChainError };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct StubChain {
        answer: Option<String>,
    }

    #[async_trait]
    impl AnswerChain for StubChain {
        async fn invoke(&self, _input: &str, _session_id: &str) -> Result<String, ChainError> {
            match &self.answer {
                Some(a) => Ok(a.clone()),
                None => Err(ChainError::Completion("stub failure".into())),
            }
        }
    }

    fn app(answer: Option<&str>) -> Router {
        let agent = Arc::new(AnswerAgent::from_chain(Arc::new(StubChain {
            answer: answer.map(|s| s.to_string()),
        })));
        router(agent)
    }

    fn fetch_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/fetch")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_answer_in_messages_field() {
        let response = app(Some("30-day returns."))
            .oneshot(fetch_request(r#"{"user_input":"What is the return policy?"}"#)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: FetchResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.messages, "30-day returns.");
    }

    #[tokio::test]
    async fn fetch_accepts_optional_session_id() {
        let response = app(Some("ok"))
            .oneshot(fetch_request(r#"{"user_input":"hi","session_id":"abc"}"#)).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chain_failure_becomes_bare_500() {
        let response = app(None)
            .oneshot(fetch_request(r#"{"user_input":"hi"}"#)).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn same_input_yields_same_output_with_deterministic_chain() {
        let app = app(Some("deterministic"));
        for _ in 0..2 {
            let response = app.clone()
                .oneshot(fetch_request(r#"{"user_input":"same"}"#)).await
                .unwrap();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let parsed: FetchResponse = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(parsed.messages, "deterministic");
        }
    }
}
