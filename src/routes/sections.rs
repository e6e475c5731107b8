//! Section API proxy routes.
//!
//! Each handler forwards one request to the section service: query string
//! verbatim, JSON body re-serialized, `Authorization` copied when present.
//! A 2xx answer is returned as-is with 200. A 404 stays a 404 so clients can
//! tell "missing" apart from "broken"; every other failure becomes a 500.
//! Both carry `{ "error": <message> }` with a fixed message per route.
//!
//! A section id is forwarded as one encoded path segment; ids that would
//! resolve as `.` or `..` get a 404 without an upstream call.

use axum::extract::{Path, RawQuery, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use super::ProxyState;
use crate::section::is_addressable_id;

/// Failure answer of a proxy route.
#[derive(Debug, PartialEq, Eq)]
pub struct ProxyFailure {
    pub status: StatusCode,
    pub message: &'static str,
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// One outbound call: where it goes and what to say if it fails.
struct Upstream<'a> {
    method: Method,
    segment: Option<String>,
    query: Option<&'a str>,
    body: Option<&'a Value>,
    failure: &'static str,
}

impl<'a> Upstream<'a> {
    fn new(method: Method, failure: &'static str) -> Self {
        Self { method, segment: None, query: None, body: None, failure }
    }

    fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    fn for_section(method: Method, id: String, failure: &'static str) -> Result<Self, ProxyFailure> {
        if !is_addressable_id(&id) {
            warn!(%id, "section id is not a single path segment");
            return Err(ProxyFailure { status: StatusCode::NOT_FOUND, message: failure });
        }
        Ok(Self::new(method, failure).segment(id))
    }

    fn query(mut self, query: Option<&'a str>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    fn body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Map an upstream status to the proxy's failure status.
pub(crate) fn failure_status(upstream: reqwest::StatusCode) -> StatusCode {
    if upstream == reqwest::StatusCode::NOT_FOUND {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn upstream_url(backend_url: &str, call: &Upstream<'_>) -> Option<reqwest::Url> {
    let mut url = reqwest::Url::parse(backend_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push("homepage-sections")
        .extend(call.segment.as_deref());
    url.set_query(call.query);
    Some(url)
}

/// Send one call and return the raw body of a success answer.
async fn dispatch(state: &ProxyState, headers: &HeaderMap, call: &Upstream<'_>) -> Result<String, ProxyFailure> {
    let internal = || ProxyFailure { status: StatusCode::INTERNAL_SERVER_ERROR, message: call.failure };

    let Some(url) = upstream_url(&state.backend_url, call) else {
        error!(backend = %state.backend_url, "{}: backend URL cannot carry a path", call.failure);
        return Err(internal());
    };

    let mut builder = state.http.request(call.method.clone(), url.clone());
    if let Some(authorization) = headers.get(AUTHORIZATION) {
        builder = builder.header(AUTHORIZATION, authorization.clone());
    }
    if let Some(body) = call.body {
        builder = builder.json(body);
    }

    let response = builder.send().await.map_err(|e| {
        error!(error = %e, method = %call.method, %url, "{}", call.failure);
        internal()
    })?;
    let status = response.status();
    let text = response.text().await.map_err(|e| {
        error!(error = %e, %url, "{}", call.failure);
        internal()
    })?;
    debug!(status = status.as_u16(), method = %call.method, %url, "section service responded");

    if !status.is_success() {
        error!(status = status.as_u16(), body = %text, %url, "{}", call.failure);
        return Err(ProxyFailure { status: failure_status(status), message: call.failure });
    }
    Ok(text)
}

/// [`dispatch`] and decode the answer as JSON.
async fn forward(state: &ProxyState, headers: &HeaderMap, call: Upstream<'_>) -> Result<Value, ProxyFailure> {
    let text = dispatch(state, headers, &call).await?;
    serde_json::from_str(&text).map_err(|e| {
        error!(error = %e, method = %call.method, "{}: invalid upstream JSON", call.failure);
        ProxyFailure { status: StatusCode::INTERNAL_SERVER_ERROR, message: call.failure }
    })
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/homepage-sections` — list, query string forwarded.
pub async fn list(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::new(Method::GET, "Failed to fetch homepage sections").query(query.as_deref());
    forward(&state, &headers, call).await.map(Json)
}

/// `POST /api/homepage-sections` — create.
pub async fn create(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::new(Method::POST, "Failed to create homepage section").body(&body);
    forward(&state, &headers, call).await.map(Json)
}

/// `GET /api/homepage-sections/{id}`
pub async fn get_one(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::for_section(Method::GET, id, "Failed to fetch homepage section")?;
    forward(&state, &headers, call).await.map(Json)
}

/// `PUT /api/homepage-sections/{id}`
pub async fn update(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::for_section(Method::PUT, id, "Failed to update homepage section")?.body(&body);
    forward(&state, &headers, call).await.map(Json)
}

/// `DELETE /api/homepage-sections/{id}`
pub async fn delete(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::for_section(Method::DELETE, id, "Failed to delete homepage section")?;
    forward(&state, &headers, call).await.map(Json)
}

/// `POST /api/homepage-sections/reorder` — any 2xx counts, body or not.
pub async fn reorder(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::new(Method::POST, "Failed to reorder homepage sections").segment("reorder").body(&body);
    dispatch(&state, &headers, &call).await?;
    Ok(Json(json!({ "success": true })))
}

/// `POST /api/homepage-sections/save-homepage`
pub async fn save_homepage(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::new(Method::POST, "Failed to save homepage").segment("save-homepage").body(&body);
    forward(&state, &headers, call).await.map(Json)
}

/// `POST /api/homepage-sections/initialize`
pub async fn initialize(State(state): State<ProxyState>, headers: HeaderMap) -> Result<Json<Value>, ProxyFailure> {
    let call = Upstream::new(Method::POST, "Failed to initialize homepage sections").segment("initialize");
    forward(&state, &headers, call).await.map(Json)
}

#[cfg(test)]
#[path = "sections_test.rs"]
mod tests;
