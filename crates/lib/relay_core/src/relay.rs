//! Chat relay — turns one user message into one assistant reply.
//!
//! Flow for [`ChatRelay::handle`]:
//! 1. Reuse the caller's thread, or create one when none was given
//! 2. Append the user message
//! 3. Run the assistant and wait for a terminal status
//! 4. Read the newest message of the thread as the reply

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::assistant::AssistantService;
use crate::error::{RelayError, RelayResult};
use crate::types::{ListMessagesQuery, MessageRole};

/// Reply to a chat message, with the thread it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub reply: String,
    /// Thread used for this exchange; callers echo it back to continue.
    pub thread_id: String,
}

/// Relays chat messages to one assistant profile.
#[derive(Clone)]
pub struct ChatRelay {
    service: Arc<dyn AssistantService>,
    assistant_id: String,
}

impl ChatRelay {
    pub fn new(service: Arc<dyn AssistantService>, assistant_id: impl Into<String>) -> Self {
        Self {
            service,
            assistant_id: assistant_id.into(),
        }
    }

    /// Send `message` to the assistant and return its reply.
    ///
    /// An empty `thread_id` counts as absent. Nothing created on the service
    /// is rolled back when a later step fails.
    pub async fn handle(&self, message: &str, thread_id: Option<&str>) -> RelayResult<ChatOutcome> {
        let thread_id = match thread_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let thread = self.service.create_thread().await?;
                info!(thread_id = %thread.id, "Created new thread");
                thread.id
            }
        };

        self.service
            .create_message(&thread_id, MessageRole::User, message)
            .await?;

        let run = self
            .service
            .create_and_poll_run(&thread_id, &self.assistant_id)
            .await?;
        info!(run_id = %run.id, status = %run.status, "Run finished");

        if run.status.is_failure() {
            warn!(
                run_id = %run.id,
                status = %run.status,
                code = run.failure_code(),
                "Run ended without a reply"
            );
            return Err(RelayError::RunFailed {
                detail: run.failure_detail(),
                run_id: run.id,
                status: run.status,
            });
        }

        let messages = self
            .service
            .list_messages(&thread_id, ListMessagesQuery::latest())
            .await?;
        let latest = messages.first().ok_or_else(|| {
            RelayError::ResponseShape(format!("thread {thread_id} has no messages"))
        })?;
        let reply = latest.first_text().ok_or_else(|| {
            RelayError::ResponseShape(format!("message {} has no text content", latest.id))
        })?;
        debug!(message_id = %latest.id, role = ?latest.role, "Extracted reply");

        Ok(ChatOutcome {
            reply: reply.to_string(),
            thread_id,
        })
    }
}
