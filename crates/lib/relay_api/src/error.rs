//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_core::RelayError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Message returned for every assistant-side failure. The cause is logged,
/// never sent to the caller.
pub const ASSISTANT_FAILURE_MESSAGE: &str = "Failed to communicate with GPT Assistant";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Assistant relay failed: {0}")]
    Assistant(#[from] RelayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::Assistant(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ASSISTANT_FAILURE_MESSAGE)
            }
        };
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use relay_core::types::RunStatus;

    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("parse JSON")
    }

    #[tokio::test]
    async fn assistant_errors_hide_their_cause() {
        let err = AppError::from(RelayError::RunFailed {
            run_id: "run_1".into(),
            status: RunStatus::Failed,
            detail: "rate_limited".into(),
        });
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "Failed to communicate with GPT Assistant"})
        );
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let resp = AppError::Validation("message is required".into()).into_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "message is required"})
        );
    }
}
