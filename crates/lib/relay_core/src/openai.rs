//! OpenAI Assistants (v2) client.
//!
//! Implements [`AssistantService`] over the `/threads` REST endpoints. Every
//! call is attempted once; there is no retry or backoff. Run polling is
//! bounded by [`AssistantConfig::run_timeout`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, warn};

use crate::assistant::AssistantService;
use crate::config::AssistantConfig;
use crate::error::{RelayError, RelayResult};
use crate::types::{
    CreateMessageRequest, CreateRunRequest, ListMessagesQuery, ListResponse, MessageRole, Run,
    Thread, ThreadMessage,
};

const OPENAI_BETA_HEADER: &str = "OpenAI-Beta";
const ASSISTANTS_V2: &str = "assistants=v2";
/// Server hint for how long to wait before the next run status check.
const POLL_AFTER_HEADER: &str = "openai-poll-after-ms";

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the OpenAI Assistants API.
#[derive(Clone)]
pub struct OpenAiAssistantClient {
    http: Client,
    config: AssistantConfig,
}

impl OpenAiAssistantClient {
    /// Build a client with the per-request timeout from `config`.
    pub fn new(config: AssistantConfig) -> RelayResult<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(RelayError::external(
                "build http client",
                format!("{} cannot be used as an API root", config.base_url),
            ));
        }
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RelayError::external("build http client", e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Authenticated request to the URL made of `segments` below the API
    /// root. Each segment is percent-encoded as a single path segment, so an
    /// id can never reach a different endpoint.
    fn request(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
    ) -> RelayResult<RequestBuilder> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(RelayError::external(
                operation,
                format!("invalid path segment {bad:?}"),
            ));
        }
        Ok(self
            .http
            .request(method, self.config.endpoint(segments))
            .bearer_auth(&self.config.api_key)
            .header(OPENAI_BETA_HEADER, ASSISTANTS_V2))
    }

    /// Send a request and turn transport failures and non-2xx statuses into
    /// [`RelayError::ExternalCall`].
    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RelayResult<Response> {
        let resp = request
            .send()
            .await
            .map_err(|e| RelayError::external(operation, format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::external(
                operation,
                format!("{status} {}", api_error_message(&body)),
            ));
        }
        Ok(resp)
    }

    async fn retrieve_run(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> RelayResult<(Run, Option<Duration>)> {
        const OP: &str = "retrieve run";
        let request = self.request(OP, Method::GET, &["threads", thread_id, "runs", run_id])?;
        let resp = self.execute(OP, request).await?;
        let hint = poll_after_hint(resp.headers());
        Ok((decode(OP, resp).await?, hint))
    }

    /// Re-fetch the run until it leaves the active statuses or the deadline
    /// passes.
    async fn poll_run(
        &self,
        thread_id: &str,
        mut run: Run,
        mut hint: Option<Duration>,
    ) -> RelayResult<Run> {
        let deadline = Instant::now() + self.config.run_timeout;

        while run.status.is_active() {
            let delay = hint.unwrap_or(self.config.poll_interval);
            let step = async {
                sleep(delay).await;
                self.retrieve_run(thread_id, &run.id).await
            };
            match timeout_at(deadline, step).await {
                Ok(result) => {
                    let (next, next_hint) = result?;
                    debug!(run_id = %next.id, status = %next.status, "Polled run");
                    run = next;
                    hint = next_hint;
                }
                Err(_) => {
                    warn!(run_id = %run.id, status = %run.status, "Gave up waiting for run");
                    return Err(RelayError::RunTimeout {
                        run_id: run.id,
                        status: run.status,
                        waited_secs: self.config.run_timeout.as_secs(),
                    });
                }
            }
        }

        Ok(run)
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistantClient {
    async fn create_thread(&self) -> RelayResult<Thread> {
        const OP: &str = "create thread";
        let request = self
            .request(OP, Method::POST, &["threads"])?
            .json(&serde_json::json!({}));
        let resp = self.execute(OP, request).await?;
        decode(OP, resp).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> RelayResult<ThreadMessage> {
        const OP: &str = "create message";
        let request = self
            .request(OP, Method::POST, &["threads", thread_id, "messages"])?
            .json(&CreateMessageRequest { role, content });
        let resp = self.execute(OP, request).await?;
        decode(OP, resp).await
    }

    async fn create_and_poll_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> RelayResult<Run> {
        const OP: &str = "create run";
        let request = self
            .request(OP, Method::POST, &["threads", thread_id, "runs"])?
            .json(&CreateRunRequest { assistant_id });
        let resp = self.execute(OP, request).await?;
        let hint = poll_after_hint(resp.headers());
        let run: Run = decode(OP, resp).await?;
        debug!(run_id = %run.id, status = %run.status, "Created run");

        self.poll_run(thread_id, run, hint).await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: ListMessagesQuery,
    ) -> RelayResult<Vec<ThreadMessage>> {
        const OP: &str = "list messages";
        let request = self
            .request(OP, Method::GET, &["threads", thread_id, "messages"])?
            .query(&query);
        let resp = self.execute(OP, request).await?;
        let page: ListResponse<ThreadMessage> = decode(OP, resp).await?;
        Ok(page.data)
    }
}

/// Decode a successful response body; a body that does not match the
/// expected shape is a [`RelayError::ResponseShape`].
async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    resp: Response,
) -> RelayResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| RelayError::external(operation, format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RelayError::ResponseShape(format!("{operation}: {e}")))
}

/// The service's `error.message` if the body is an API error, else the body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn poll_after_hint(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(POLL_AFTER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn api_error_message_extracts_nested_message() {
        let body =
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn poll_after_hint_reads_milliseconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(poll_after_hint(&headers), None);

        headers.insert(POLL_AFTER_HEADER, HeaderValue::from_static("250"));
        assert_eq!(poll_after_hint(&headers), Some(Duration::from_millis(250)));

        headers.insert(POLL_AFTER_HEADER, HeaderValue::from_static("soon"));
        assert_eq!(poll_after_hint(&headers), None);
    }
}
