//! # relay_api
//!
//! HTTP API library for the assistant relay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use relay_core::{AssistantService, ChatRelay, OpenAiAssistantClient, RelayResult};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, health};

/// Route paths served by [`router`].
pub mod routes {
    pub const POST_CHAT: &str = "/chat";
    pub const GET_HEALTH: &str = "/health";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relay bound to the configured assistant profile.
    pub relay: ChatRelay,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by the OpenAI Assistants client.
    pub fn new(config: ApiConfig) -> RelayResult<Self> {
        let client = OpenAiAssistantClient::new(config.assistant.clone())?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// State backed by any [`AssistantService`] implementation.
    pub fn with_service(config: ApiConfig, service: Arc<dyn AssistantService>) -> Self {
        let relay = ChatRelay::new(service, config.assistant.assistant_id.clone());
        Self { relay, config }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_CHAT, post(chat::chat_handler))
        .route(routes::GET_HEALTH, get(health::health_handler))
        .layer(cors)
        .with_state(state)
}
