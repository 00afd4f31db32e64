pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    ai_service::AIService, canned_service::CannedInterviewer, collaborators::Collaborators,
    session_service::SessionService,
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    /// Which interviewer answers: "openai" or "canned".
    pub backend: &'static str,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = config.ai_timeout();
        let (collaborators, backend) = match &config.openai_api_key {
            Some(api_key) => {
                let http_client = Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
                let ai = Arc::new(AIService::new(
                    api_key.clone(),
                    config.openai_base_url.clone(),
                    config.openai_model.clone(),
                    http_client,
                ));
                (
                    Collaborators::new(ai.clone(), ai.clone(), ai, timeout),
                    "openai",
                )
            }
            None => {
                let canned = Arc::new(CannedInterviewer::new());
                (
                    Collaborators::new(canned.clone(), canned.clone(), canned, timeout),
                    "canned",
                )
            }
        };

        Ok(Self::with_collaborators(config, collaborators, backend))
    }

    pub fn with_collaborators(
        config: &Config,
        collaborators: Collaborators,
        backend: &'static str,
    ) -> Self {
        let sessions = SessionService::new(collaborators, &config.secret_key, config.session_ttl());
        Self { sessions, backend }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/interview",
            post(routes::interview::start_interview)
                .get(routes::interview::get_session)
                .delete(routes::interview::restart),
        )
        .route("/api/interview/answer", post(routes::interview::submit_answer))
        .route("/api/interview/summary", get(routes::interview::get_summary))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
