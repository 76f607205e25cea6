//! Assistant service client configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

/// Placeholder used when no API key is configured. Requests made with it are
/// rejected by the service, so a missing key shows up per request.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_FALLBACK_KEY";
/// Assistant profile used when none is configured.
pub const DEFAULT_ASSISTANT_ID: &str = "asst_u3CYocbChFJ74LdmICzvC5qB";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Settings for talking to the hosted assistant service.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AssistantConfig {
    /// Bearer credential for the service.
    pub api_key: String,
    /// Assistant profile every run is created with.
    pub assistant_id: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: Url,
    /// Delay between run status checks when the service gives no hint.
    pub poll_interval: Duration,
    /// Upper bound on waiting for a run to reach a terminal status.
    pub run_timeout: Duration,
    /// Timeout applied to every individual HTTP call.
    pub request_timeout: Duration,
}

impl AssistantConfig {
    /// Config with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            assistant_id: DEFAULT_ASSISTANT_ID.to_string(),
            base_url: default_base_url(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            run_timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Whether the credential is still the placeholder.
    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key.is_empty() || self.api_key == PLACEHOLDER_API_KEY
    }

    /// Absolute URL for `segments` below the API root.
    ///
    /// Each segment is percent-encoded on its own (`/` and `?` included), so
    /// an identifier always stays one path segment. A root without a trailing
    /// slash (`/v1`) keeps its last segment, unlike `Url::join`.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Roots that cannot be a base are rejected when the client is built.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"<redacted>")
            .field("assistant_id", &self.assistant_id)
            .field("base_url", &self.base_url.as_str())
            .field("poll_interval", &self.poll_interval)
            .field("run_timeout", &self.run_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
