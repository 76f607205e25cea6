//! Wire types for the hosted assistant service (threads, messages, runs).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A conversation thread owned by the assistant service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Author of a thread message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A message stored in a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Text of the first text content part, if there is one.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|part| match part {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Other => None,
        })
    }
}

/// One content part of a message. Only text parts carry a reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Body for appending a message to a thread.
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: MessageRole,
    pub content: &'a str,
}

/// Body for starting a run.
#[derive(Debug, Serialize)]
pub struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
}

/// One execution of an assistant against a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    /// Human-readable reason for a non-successful run: the service's error
    /// message when it gave one, otherwise the bare status.
    pub fn failure_detail(&self) -> String {
        self.last_error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.status.to_string())
    }

    /// Machine-readable error code the service attached, e.g.
    /// `rate_limit_exceeded`.
    pub fn failure_code(&self) -> Option<&str> {
        self.last_error.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }

    /// Whether the service will still change this status on its own.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }

    /// Terminal statuses after which no reply can be read.
    ///
    /// `requires_action` is included because the relay never submits tool
    /// outputs, so such a run would otherwise hang until it expires.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed
                | RunStatus::Expired
                | RunStatus::Cancelled
                | RunStatus::RequiresAction
                | RunStatus::Unknown
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for list endpoints. The relay only ever reads newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Desc,
}

/// Query for listing thread messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListMessagesQuery {
    pub order: SortOrder,
    pub limit: u32,
}

impl ListMessagesQuery {
    /// Only the most recent message.
    pub fn latest() -> Self {
        Self {
            order: SortOrder::Desc,
            limit: 1,
        }
    }
}

/// Envelope of the service's list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn run_status_parses_known_and_unknown_values() {
        let status: RunStatus = serde_json::from_value(json!("in_progress")).expect("parse");
        assert_eq!(status, RunStatus::InProgress);
        assert!(status.is_active());

        let status: RunStatus = serde_json::from_value(json!("paused_forever")).expect("parse");
        assert_eq!(status, RunStatus::Unknown);
        assert!(!status.is_active());
        assert!(status.is_failure());
    }

    #[test]
    fn only_failed_expired_cancelled_and_requires_action_are_failures() {
        let failures: Vec<RunStatus> = [
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Cancelling,
            RunStatus::Cancelled,
            RunStatus::Failed,
            RunStatus::Completed,
            RunStatus::Incomplete,
            RunStatus::Expired,
        ]
        .into_iter()
        .filter(RunStatus::is_failure)
        .collect();
        assert_eq!(
            failures,
            vec![
                RunStatus::RequiresAction,
                RunStatus::Cancelled,
                RunStatus::Failed,
                RunStatus::Expired,
            ]
        );
    }

    #[test]
    fn failure_detail_prefers_last_error_message() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "status": "failed",
            "last_error": {"code": "rate_limit_exceeded", "message": "rate_limited"}
        }))
        .expect("parse run");
        assert_eq!(run.failure_detail(), "rate_limited");
        assert_eq!(run.failure_code(), Some("rate_limit_exceeded"));

        let run: Run = serde_json::from_value(json!({
            "id": "run_2",
            "status": "expired",
            "last_error": null
        }))
        .expect("parse run");
        assert_eq!(run.failure_detail(), "expired");
        assert_eq!(run.failure_code(), None);
    }

    #[test]
    fn first_text_skips_non_text_parts() {
        let message: ThreadMessage = serde_json::from_value(json!({
            "id": "msg_1",
            "object": "thread.message",
            "role": "assistant",
            "content": [
                {"type": "image_file", "image_file": {"file_id": "file_1"}},
                {"type": "text", "text": {"value": "Hi there", "annotations": []}}
            ]
        }))
        .expect("parse message");
        assert_eq!(message.first_text(), Some("Hi there"));
    }

    #[test]
    fn first_text_is_none_without_text_parts() {
        let message: ThreadMessage = serde_json::from_value(json!({
            "id": "msg_1",
            "role": "assistant",
            "content": []
        }))
        .expect("parse message");
        assert_eq!(message.first_text(), None);
    }

    #[test]
    fn latest_query_serializes_desc_limit_one() {
        let value = serde_json::to_value(ListMessagesQuery::latest()).expect("serialize");
        assert_eq!(value, json!({"order": "desc", "limit": 1}));
    }
}
