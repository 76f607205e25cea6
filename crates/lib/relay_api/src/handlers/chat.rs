//! Chat request handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse};

/// `POST /chat` — relay one message to the assistant and return its reply.
///
/// Whatever goes wrong on the assistant side is logged with its cause and
/// answered with one generic 500.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("message is required".into()))?;
    if !body.thread_id.as_deref().is_none_or(is_valid_thread_id) {
        return Err(AppError::Validation("threadId is invalid".into()));
    }

    let request_id = Uuid::now_v7();
    let span = info_span!("chat", %request_id);
    debug!(
        parent: &span,
        thread_id = body.thread_id.as_deref().unwrap_or("<new>"),
        "Relaying chat message"
    );

    let outcome = state
        .relay
        .handle(&message, body.thread_id.as_deref())
        .instrument(span.clone())
        .await
        .inspect_err(|e| {
            error!(parent: &span, kind = e.kind(), error = %e, "Error processing chat request");
        })?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        new_thread_id: outcome.thread_id,
    }))
}

/// Thread ids are opaque service tokens such as `thread_abc123`. Anything
/// outside `[A-Za-z0-9_-]` could reshape the upstream request path. Empty
/// passes and means "start a new thread".
fn is_valid_thread_id(id: &str) -> bool {
    id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_ids_are_restricted_to_token_characters() {
        assert!(is_valid_thread_id("thread_abc123"));
        assert!(is_valid_thread_id("thread-X9"));
        assert!(is_valid_thread_id(""));
        assert!(!is_valid_thread_id("thread_a/runs/run_1"));
        assert!(!is_valid_thread_id(".."));
        assert!(!is_valid_thread_id("thread_a?limit=100"));
        assert!(!is_valid_thread_id("thread a"));
    }
}
