//! API server configuration.

use relay_core::AssistantConfig;

/// Name reported by the health endpoint.
pub const DEFAULT_SERVICE_NAME: &str = "assistant-relay";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// Service name reported by `GET /health`.
    pub service_name: String,
    /// Assistant service settings.
    pub assistant: AssistantConfig,
}

impl ApiConfig {
    pub fn new(bind_addr: impl Into<String>, assistant: AssistantConfig) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            assistant,
        }
    }
}
