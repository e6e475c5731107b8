//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin console talks to `/api/homepage-sections/*`, which this router
//! forwards to the section service at `BACKEND_URL`. Two read-only pages
//! render the current section list: the live preview as HTML and the code a
//! save would write as plain text.

pub mod pages;
pub mod sections;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::repo::RepoError;

/// Shared state for every proxy handler.
#[derive(Clone)]
pub struct ProxyState {
    pub http: reqwest::Client,
    /// Section service base URL without a trailing slash.
    pub backend_url: String,
}

impl ProxyState {
    /// # Errors
    ///
    /// Returns [`RepoError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RepoError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(http, &config.backend_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, backend_url: &str) -> Self {
        Self { http, backend_url: backend_url.trim_end_matches('/').to_owned() }
    }
}

/// Proxy API, preview pages and health check.
pub fn app(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/homepage-sections", get(sections::list).post(sections::create))
        .route("/api/homepage-sections/reorder", post(sections::reorder))
        .route("/api/homepage-sections/save-homepage", post(sections::save_homepage))
        .route("/api/homepage-sections/initialize", post(sections::initialize))
        .route(
            "/api/homepage-sections/{id}",
            get(sections::get_one)
                .put(sections::update)
                .delete(sections::delete),
        )
        .route("/admin/homepage/preview", get(pages::preview))
        .route("/admin/homepage/code", get(pages::code))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
