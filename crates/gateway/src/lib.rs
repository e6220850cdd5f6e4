//! HTTP gateway for Notewire.
//!
//! Exposes the Telegram webhook, a serverless-style invocation endpoint and
//! a health check. Update handling never produces an error status: Telegram
//! keeps redelivering updates it does not see acknowledged.
//!
//! Built on Axum.

pub mod event;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::BytesRejection;
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use notewire_pipeline::Dispatcher;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use event::{FunctionEvent, FunctionResponse, decode_update, handle_event, handle_raw_event};

/// Request body limit for inbound updates.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub dispatcher: Arc<Dispatcher>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .route("/invoke", post(invoke_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: notewire_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);
    if !dispatcher.delivery_enabled() || !dispatcher.extraction_enabled() {
        warn!(
            missing = ?config.missing_keys(),
            "Running with incomplete configuration; affected updates are acknowledged and dropped"
        );
    }

    let app = build_router(Arc::new(GatewayState { dispatcher }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Raw Telegram update, as posted by `setWebhook`.
async fn webhook_handler(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> &'static str {
    let Some(body) = accept_body(body) else {
        return "ok";
    };
    match event::parse_update(&body) {
        Ok(update) => {
            state.dispatcher.dispatch(&update).await;
        }
        Err(e) => warn!(error = %e, body_len = body.len(), "Dropping undecodable update"),
    }
    "ok"
}

/// Serverless-style event wrapping the update.
async fn invoke_handler(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<FunctionResponse> {
    match accept_body(body) {
        Some(body) => Json(handle_raw_event(&state.dispatcher, &body).await),
        None => Json(FunctionResponse::ok()),
    }
}

/// Unreadable or oversized bodies are dropped, never answered with an error.
fn accept_body(body: Result<Bytes, BytesRejection>) -> Option<Bytes> {
    match body {
        Ok(body) => Some(body),
        Err(rejection) => {
            warn!(
                status = rejection.status().as_u16(),
                error = %rejection.body_text(),
                "Dropping unreadable request body"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use notewire_core::error::{ChannelError, ProviderError};
    use notewire_core::{Channel, ChatId, Provider, ProviderRequest, ProviderResponse};
    use notewire_pipeline::{NoteExtractor, Orchestrator};
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct RecordingChannel {
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, chat_id: &ChatId, content: &str) -> Result<(), ChannelError> {
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.clone(), content.to_string()));
            Ok(())
        }
    }

    struct NoteProvider;

    #[async_trait]
    impl Provider for NoteProvider {
        fn name(&self) -> &str {
            "note"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                text: r#"{"type":"note","title":"Idea","clean_text":"Idea","due":null,"priority":"low","tags":["x"],"action_items":[],"questions":[]}"#.into(),
                usage: None,
                model: "test".into(),
            })
        }
    }

    fn test_state() -> (SharedState, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel {
            sent: Mutex::new(Vec::new()),
        });
        let dispatcher = Dispatcher::new(
            Some(channel.clone()),
            Some(Orchestrator::new(NoteExtractor::new(Arc::new(NoteProvider)))),
        );
        (
            Arc::new(GatewayState {
                dispatcher: Arc::new(dispatcher),
            }),
            channel,
        )
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (state, _) = test_state();
        let app = build_router(state);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn webhook_delivers_note() {
        let (state, channel) = test_state();
        let app = build_router(state);

        let response = app
            .oneshot(post(
                "/webhook",
                r#"{"update_id":1,"message":{"text":"idea","chat":{"id":3}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");

        let sent = channel.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ChatId::Int(3));
        assert!(sent[0].1.starts_with("Type: note\nTitle: Idea\n"));
    }

    #[tokio::test]
    async fn webhook_acks_garbage() {
        let (state, channel) = test_state();
        let app = build_router(state);

        let response = app.oneshot(post("/webhook", "<html>")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invoke_decodes_base64_event() {
        use base64::Engine;
        let (state, channel) = test_state();
        let app = build_router(state);

        let update = r#"{"message":{"chat":{"id":8}}}"#;
        let event = serde_json::json!({
            "body": base64::engine::general_purpose::STANDARD.encode(update),
            "isBase64Encoded": true,
        });

        let response = app
            .oneshot(post("/invoke", event.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"statusCode":200,"body":"ok"}"#
        );

        // No text: the prompt is delivered, escaped for MarkdownV2.
        let sent = channel.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![(ChatId::Int(8), "Пришли текст заметки\\.".to_string())]);
    }

    #[tokio::test]
    async fn oversized_body_is_acknowledged() {
        let (state, channel) = test_state();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post("/webhook", vec![b' '; BODY_LIMIT + 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");

        let response = app
            .oneshot(post("/invoke", vec![b' '; BODY_LIMIT + 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"statusCode":200,"body":"ok"}"#
        );

        assert!(channel.sent.lock().unwrap().is_empty());
    }
}
