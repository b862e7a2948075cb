use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tweetalchemy_core::{
    CoreError, ErrorBody, OPTIMIZE_PATH, OptimizationOptions, OptimizationResult, SYSTEM_PROMPT,
    build_prompt, optimization_result, validate_text,
};

pub mod config;
pub mod upstream;

use upstream::{ChatMessage, ChatRequest, CompletionBackend, UpstreamError};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn CompletionBackend>,
    model: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<Arc<str>>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl From<CoreError> for OptimizeError {
    fn from(err: CoreError) -> Self {
        OptimizeError::Validation(err.to_string())
    }
}

impl OptimizeError {
    fn status(&self) -> StatusCode {
        match self {
            OptimizeError::Validation(_) => StatusCode::BAD_REQUEST,
            OptimizeError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OptimizeError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(OPTIMIZE_PATH, post(optimize_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), String> {
    info!(
        "listening on {}",
        listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_owned())
    );
    axum::serve(listener, build_router(state))
        .await
        .map_err(|err| err.to_string())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz_handler() -> impl IntoResponse {
    Json(serde_json::json!({"ok": true}))
}

async fn optimize_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OptimizationResult>, OptimizeError> {
    let body = body.map_err(|rejection| {
        warn!("unreadable optimize request body: {}", rejection.body_text());
        OptimizeError::Validation(rejection.body_text())
    })?;
    let (text, options) = parse_optimize_body(&body).inspect_err(|err| {
        warn!("rejected optimize request: {}", err);
    })?;

    debug!(chars = text.chars().count(), ?options, "optimizing tweet");
    let request = ChatRequest {
        model: state.model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(&text, &options)),
        ],
    };

    let completion = state.backend.complete(&request).await.map_err(|err| {
        error!("optimization failed: {}", err);
        OptimizeError::from(err)
    })?;

    Ok(Json(optimization_result(&text, completion.as_deref())))
}

/// Loose parse of the request body so a missing or non-string `text` is
/// reported the same way as an empty one.
fn parse_optimize_body(body: &[u8]) -> Result<(String, OptimizationOptions), OptimizeError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| OptimizeError::Validation(format!("invalid JSON body: {err}")))?;

    let text = validate_text(value.get("text").and_then(Value::as_str))?.to_owned();

    let options = match value.get("options") {
        None | Some(Value::Null) => OptimizationOptions::default(),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|err| OptimizeError::Validation(format!("invalid options: {err}")))?,
    };

    Ok((text, options))
}

#[cfg(test)]
mod tests {
    use tweetalchemy_core::Tone;

    use super::*;

    #[test]
    fn body_with_nested_options_parses() {
        let (text, options) = parse_optimize_body(
            br#"{"text":"going to the store","options":{"grammar":true,"hashtags":true,"tone":"professional"}}"#,
        )
        .unwrap();
        assert_eq!(text, "going to the store");
        assert!(options.grammar);
        assert!(options.hashtags);
        assert!(!options.emojis);
        assert_eq!(options.tone, Tone::Professional);
    }

    #[test]
    fn missing_or_non_string_text_is_validation_error() {
        let bodies: [&[u8]; 5] = [
            br#"{}"#,
            br#"{"text":""}"#,
            br#"{"text":"   "}"#,
            br#"{"text":42}"#,
            br#"{"text":null,"options":{}}"#,
        ];
        for body in bodies {
            let err = parse_optimize_body(body).unwrap_err();
            assert_eq!(err.to_string(), "No text provided");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn malformed_body_or_options_are_validation_errors() {
        let err = parse_optimize_body(b"not json").unwrap_err();
        assert!(matches!(err, OptimizeError::Validation(_)));

        let err = parse_optimize_body(br#"{"text":"hi","options":{"tone":"friendly"}}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid options"));
    }

    #[test]
    fn upstream_errors_map_to_500() {
        let err = OptimizeError::from(UpstreamError::Status {
            status: 401,
            body: "bad key".to_owned(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("401"));
    }
}
