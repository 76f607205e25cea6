//! Assistant relay server binary.
//!
//! Serves `POST /chat` and `GET /health`. Every setting can come from a flag
//! or the environment (a `.env` file in the working directory is loaded
//! first).

use std::time::Duration;

use clap::Parser;
use relay_api::config::ApiConfig;
use relay_core::AssistantConfig;
use relay_core::config::{
    DEFAULT_ASSISTANT_ID, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RUN_TIMEOUT_SECS, PLACEHOLDER_API_KEY,
};
use tracing::{info, warn};
use url::Url;

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "relay_server", about = "HTTP relay to a hosted OpenAI assistant")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// OpenAI API key.
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        default_value = PLACEHOLDER_API_KEY,
        hide_env_values = true
    )]
    openai_api_key: String,

    /// Assistant profile used for every run.
    #[arg(long, env = "ASSISTANT_ID", default_value = DEFAULT_ASSISTANT_ID)]
    assistant_id: String,

    /// API root of the assistant service.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: Url,

    /// Delay between run status checks when the service sends no hint.
    #[arg(long, env = "RUN_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Give up on a run that is still active after this long.
    #[arg(long, env = "RUN_TIMEOUT_SECS", default_value_t = DEFAULT_RUN_TIMEOUT_SECS)]
    run_timeout_secs: u64,

    /// Timeout for each individual call to the assistant service.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        let assistant = AssistantConfig {
            api_key: self.openai_api_key,
            assistant_id: self.assistant_id,
            base_url: self.openai_base_url,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            run_timeout: Duration::from_secs(self.run_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        };
        ApiConfig::new(format!("{}:{}", self.host, self.port), assistant)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relay_api=debug,relay_core=debug".parse().unwrap()),
        )
        .init();

    let config = Args::parse().into_config();

    info!(
        version = relay_core::version(),
        assistant = ?config.assistant,
        "starting relay_server"
    );
    if config.assistant.uses_placeholder_key() {
        warn!("OPENAI_API_KEY is not set; the assistant service will reject every chat request");
    }

    let state = relay_api::AppState::new(config.clone())?;
    let app = relay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_parses_without_trailing_slash() {
        let url: Url = DEFAULT_BASE_URL.parse().expect("default url");
        assert_eq!(url.as_str(), "https://api.openai.com/v1");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Args::try_parse_from([
            "relay_server",
            "--port",
            "8080",
            "--assistant-id",
            "asst_other",
            "--openai-base-url",
            "http://localhost:4010/v1",
            "--run-timeout-secs",
            "5",
        ])
        .expect("parse flags")
        .into_config();

        assert!(config.bind_addr.ends_with(":8080"));
        assert_eq!(config.assistant.assistant_id, "asst_other");
        assert_eq!(
            config.assistant.endpoint(&["threads"]).as_str(),
            "http://localhost:4010/v1/threads"
        );
        assert_eq!(config.assistant.run_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = Args::try_parse_from(["relay_server", "--openai-base-url", "not a url"]);
        assert!(result.is_err());
    }
}
