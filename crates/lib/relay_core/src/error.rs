//! Relay error types.

use thiserror::Error;

use crate::types::RunStatus;

/// Convenience alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Everything that can go wrong between receiving a chat message and
/// extracting the assistant's reply.
///
/// The HTTP layer collapses all variants into one generic response; the
/// variant and its detail are only ever logged.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Network failure, non-success HTTP status, or an undecodable body.
    #[error("Assistant API call failed ({operation}): {detail}")]
    ExternalCall {
        operation: &'static str,
        detail: String,
    },

    /// The run stopped in a status that produced no usable reply.
    #[error("Run {run_id} ended with status {status}: {detail}")]
    RunFailed {
        run_id: String,
        status: RunStatus,
        detail: String,
    },

    /// The run was still active when the wait deadline passed.
    #[error("Run {run_id} did not finish within {waited_secs}s (last status {status})")]
    RunTimeout {
        run_id: String,
        status: RunStatus,
        waited_secs: u64,
    },

    /// The service answered, but not with something a reply can be read from.
    #[error("Unexpected assistant response: {0}")]
    ResponseShape(String),
}

impl RelayError {
    pub(crate) fn external(operation: &'static str, detail: impl Into<String>) -> Self {
        RelayError::ExternalCall {
            operation,
            detail: detail.into(),
        }
    }

    /// Short, stable tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::ExternalCall { .. } => "external_call_failed",
            RelayError::RunFailed { .. } => "run_terminal_failure",
            RelayError::RunTimeout { .. } => "run_timeout",
            RelayError::ResponseShape(_) => "response_shape_invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_failed_display_includes_detail() {
        let err = RelayError::RunFailed {
            run_id: "run_1".into(),
            status: RunStatus::Failed,
            detail: "rate_limited".into(),
        };
        assert_eq!(
            err.to_string(),
            "Run run_1 ended with status failed: rate_limited"
        );
        assert_eq!(err.kind(), "run_terminal_failure");
    }

    #[test]
    fn external_helper_builds_external_call() {
        let err = RelayError::external("create thread", "connection refused");
        assert!(matches!(
            err,
            RelayError::ExternalCall {
                operation: "create thread",
                ..
            }
        ));
        assert_eq!(err.kind(), "external_call_failed");
    }
}
