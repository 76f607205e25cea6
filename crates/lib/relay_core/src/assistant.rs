//! Assistant service seam.
//!
//! The relay only needs four operations from the hosted service. Keeping
//! them behind a trait lets the HTTP layer run against the real OpenAI
//! client in production and a scripted implementation in tests.

use async_trait::async_trait;

use crate::error::RelayResult;
use crate::types::{ListMessagesQuery, MessageRole, Run, Thread, ThreadMessage};

#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Create an empty thread.
    async fn create_thread(&self) -> RelayResult<Thread>;

    /// Append a message to an existing thread.
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> RelayResult<ThreadMessage>;

    /// Start a run of `assistant_id` on the thread and wait until the run
    /// leaves the active statuses. The returned run may still be a failure;
    /// judging the status is the caller's job.
    async fn create_and_poll_run(&self, thread_id: &str, assistant_id: &str) -> RelayResult<Run>;

    /// List messages of a thread.
    async fn list_messages(
        &self,
        thread_id: &str,
        query: ListMessagesQuery,
    ) -> RelayResult<Vec<ThreadMessage>>;
}
