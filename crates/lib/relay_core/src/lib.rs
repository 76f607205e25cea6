//! # relay_core
//!
//! Core relay logic: the hosted assistant service seam, its OpenAI
//! Assistants implementation, and the chat relay operation built on top.

pub mod assistant;
pub mod config;
pub mod error;
pub mod openai;
pub mod relay;
pub mod types;

pub use assistant::AssistantService;
pub use config::AssistantConfig;
pub use error::{RelayError, RelayResult};
pub use openai::OpenAiAssistantClient;
pub use relay::{ChatOutcome, ChatRelay};

/// Release version of the relay, reported by `/health` and at startup.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
