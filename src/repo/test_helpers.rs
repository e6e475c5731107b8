//! Test doubles for the section service.
//!
//! [`FakeRepository`] implements the trait in memory with scripted failures
//! for manager tests. [`spawn_fake_backend`] serves the same behavior over
//! real HTTP on `127.0.0.1:0` for client and proxy tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;

use super::{RepoError, SectionRepository};
use crate::registry::TemplateId;
use crate::section::{
    InitializeResult, ListFilter, ReorderRequest, SaveHomepage, SaveResult, Section, SectionConfig, SectionDraft,
    SectionOrder, SectionPatch,
};

// =============================================================================
// FAKE REPOSITORY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Create,
    Update,
    Delete,
    Reorder,
    Save,
    Initialize,
}

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Network,
    Server(u16),
    NotFound,
}

impl Failure {
    fn into_error(self) -> RepoError {
        match self {
            Self::Network => RepoError::Network("connection refused".into()),
            Self::Server(status) => RepoError::Server { status, body: "boom".into() },
            Self::NotFound => RepoError::NotFound { resource: "scripted".into() },
        }
    }
}

#[derive(Default)]
struct FakeInner {
    sections: Vec<Section>,
    next_id: u64,
    counts: HashMap<Op, usize>,
    scripted: Vec<(Op, usize, Failure)>,
    calls: Vec<Op>,
    saved: Vec<SaveHomepage>,
    save_success: bool,
    empty_is_not_found: bool,
}

/// In-memory section service with scripted failures.
pub struct FakeRepository {
    inner: Mutex<FakeInner>,
}

impl FakeRepository {
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self { inner: Mutex::new(FakeInner { sections, save_success: true, ..FakeInner::default() }) }
    }

    /// Answer `list` with NotFound while the store is empty.
    #[must_use]
    pub fn with_empty_as_not_found(self) -> Self {
        self.lock().empty_is_not_found = true;
        self
    }

    /// Fail the `nth` (0-based) upcoming call of `op`.
    pub fn fail_on(&self, op: Op, nth: usize, failure: Failure) {
        let mut inner = self.lock();
        let target = inner.counts.get(&op).copied().unwrap_or(0) + nth;
        inner.scripted.push((op, target, failure));
    }

    pub fn set_save_success(&self, success: bool) {
        self.lock().save_success = success;
    }

    /// Stored records in storage order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Section> {
        self.lock().sections.clone()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Op> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn count(&self, op: Op) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    #[must_use]
    pub fn saved(&self) -> Vec<SaveHomepage> {
        self.lock().saved.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeInner> {
        self.inner.lock().expect("fake repository mutex poisoned")
    }

    /// Record the call and return the scripted failure, if any.
    fn enter(&self, op: Op) -> Result<std::sync::MutexGuard<'_, FakeInner>, RepoError> {
        let mut inner = self.lock();
        let index = inner.counts.get(&op).copied().unwrap_or(0);
        inner.counts.insert(op, index + 1);
        inner.calls.push(op);
        if let Some(pos) = inner.scripted.iter().position(|(o, n, _)| *o == op && *n == index) {
            let (_, _, failure) = inner.scripted.remove(pos);
            return Err(failure.into_error());
        }
        Ok(inner)
    }
}

fn not_found(id: &str) -> RepoError {
    RepoError::NotFound { resource: format!("section {id}") }
}

#[async_trait::async_trait]
impl SectionRepository for FakeRepository {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Section>, RepoError> {
        let inner = self.enter(Op::List)?;
        if inner.sections.is_empty() && inner.empty_is_not_found {
            return Err(RepoError::NotFound { resource: "/homepage-sections".into() });
        }
        let mut out: Vec<Section> = inner
            .sections
            .iter()
            .filter(|s| filter.enabled.is_none_or(|enabled| s.enabled == enabled))
            .cloned()
            .collect();
        crate::section::sort_by_order(&mut out);
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Section, RepoError> {
        let inner = self.enter(Op::Get)?;
        inner.sections.iter().find(|s| s.id == id).cloned().ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: &SectionDraft) -> Result<Section, RepoError> {
        let mut inner = self.enter(Op::Create)?;
        inner.next_id += 1;
        let section = Section {
            id: format!("sec-{}", inner.next_id),
            name: draft.name.clone(),
            component: draft.component.clone(),
            enabled: draft.enabled,
            config: draft.config.clone(),
            order: draft.order,
            created_at: Some("2025-01-01T00:00:00Z".into()),
            updated_at: Some("2025-01-01T00:00:00Z".into()),
            author_id: draft.author_id.clone(),
            author: None,
        };
        inner.sections.push(section.clone());
        Ok(section)
    }

    async fn update(&self, id: &str, patch: &SectionPatch) -> Result<Section, RepoError> {
        let mut inner = self.enter(Op::Update)?;
        let section = inner.sections.iter_mut().find(|s| s.id == id).ok_or_else(|| not_found(id))?;
        patch.apply_to(section);
        Ok(section.clone())
    }

    async fn delete(&self, id: &str) -> Result<Section, RepoError> {
        let mut inner = self.enter(Op::Delete)?;
        let pos = inner.sections.iter().position(|s| s.id == id).ok_or_else(|| not_found(id))?;
        Ok(inner.sections.remove(pos))
    }

    async fn reorder(&self, orders: &[SectionOrder]) -> Result<(), RepoError> {
        let mut inner = self.enter(Op::Reorder)?;
        if let Some(missing) = orders.iter().find(|o| !inner.sections.iter().any(|s| s.id == o.id)) {
            return Err(not_found(&missing.id));
        }
        for entry in orders {
            if let Some(section) = inner.sections.iter_mut().find(|s| s.id == entry.id) {
                section.order = entry.order;
            }
        }
        Ok(())
    }

    async fn save_rendering(&self, request: &SaveHomepage) -> Result<SaveResult, RepoError> {
        let mut inner = self.enter(Op::Save)?;
        inner.saved.push(request.clone());
        let success = inner.save_success;
        let message = if success { "Homepage saved successfully" } else { "write refused" };
        Ok(SaveResult { success, message: message.into() })
    }

    async fn initialize_defaults(&self) -> Result<InitializeResult, RepoError> {
        let mut inner = self.enter(Op::Initialize)?;
        if !inner.sections.is_empty() {
            return Ok(InitializeResult { message: "Sections already initialized".into() });
        }
        for (index, template) in TemplateId::ALL.into_iter().enumerate() {
            inner.next_id += 1;
            let id = format!("sec-{}", inner.next_id);
            inner.sections.push(Section {
                id,
                name: template.display_name().into(),
                component: template.component_name().into(),
                enabled: true,
                config: SectionConfig::new(),
                order: i64::try_from(index).unwrap_or(i64::MAX),
                created_at: None,
                updated_at: None,
                author_id: None,
                author: None,
            });
        }
        Ok(InitializeResult { message: "Default sections initialized".into() })
    }
}

// =============================================================================
// FAKE HTTP BACKEND
// =============================================================================

/// State behind the fake HTTP backend; tests inspect it after requests.
#[derive(Default)]
pub struct FakeBackend {
    pub sections: Vec<Section>,
    pub last_authorization: Option<String>,
    pub last_query: Option<String>,
    pub last_save: Option<SaveHomepage>,
    /// Decoded `{id}` of the last per-section request.
    pub last_id: Option<String>,
    /// Requests that matched no section route.
    pub stray_paths: Vec<String>,
    /// When set, every request answers with this status.
    pub fail_status: Option<u16>,
    /// When set, a successful reorder answers with this status and no body.
    pub reorder_status: Option<u16>,
}

pub type SharedBackend = Arc<Mutex<FakeBackend>>;

/// Serve a fake section backend on an ephemeral port. Returns its base URL.
pub async fn spawn_fake_backend(backend: FakeBackend) -> (String, SharedBackend) {
    let shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/homepage-sections", get(fb_list).post(fb_create))
        .route("/homepage-sections/reorder", post(fb_reorder))
        .route("/homepage-sections/save-homepage", post(fb_save))
        .route("/homepage-sections/initialize", post(fb_initialize))
        .route("/homepage-sections/{id}", get(fb_get).put(fb_update).delete(fb_delete))
        .fallback(fb_stray)
        .with_state(shared.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend failed");
    });
    (format!("http://{addr}"), shared)
}

/// Base URL on which nothing listens.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

fn record<'a>(shared: &'a SharedBackend, headers: &HeaderMap) -> Result<std::sync::MutexGuard<'a, FakeBackend>, Response> {
    let mut backend = shared.lock().expect("fake backend mutex poisoned");
    backend.last_authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if let Some(status) = backend.fail_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err((status, Json(json!({ "message": "scripted failure" }))).into_response());
    }
    Ok(backend)
}

fn missing(id: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("section {id} not found") }))).into_response()
}

async fn fb_list(State(shared): State<SharedBackend>, headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    backend.last_query = query;
    let mut sections = backend.sections.clone();
    crate::section::sort_by_order(&mut sections);
    Json(sections).into_response()
}

async fn fb_get(State(shared): State<SharedBackend>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    backend.last_id = Some(id.clone());
    match backend.sections.iter().find(|s| s.id == id) {
        Some(section) => Json(section.clone()).into_response(),
        None => missing(&id),
    }
}

async fn fb_create(State(shared): State<SharedBackend>, headers: HeaderMap, Json(draft): Json<SectionDraft>) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    let section = Section {
        id: uuid::Uuid::new_v4().to_string(),
        name: draft.name,
        component: draft.component,
        enabled: draft.enabled,
        config: draft.config,
        order: draft.order,
        created_at: Some("2025-01-01T00:00:00Z".into()),
        updated_at: Some("2025-01-01T00:00:00Z".into()),
        author_id: draft.author_id,
        author: None,
    };
    backend.sections.push(section.clone());
    (StatusCode::CREATED, Json(section)).into_response()
}

async fn fb_update(
    State(shared): State<SharedBackend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<SectionPatch>,
) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    backend.last_id = Some(id.clone());
    match backend.sections.iter_mut().find(|s| s.id == id) {
        Some(section) => {
            patch.apply_to(section);
            Json(section.clone()).into_response()
        }
        None => missing(&id),
    }
}

async fn fb_delete(State(shared): State<SharedBackend>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    backend.last_id = Some(id.clone());
    match backend.sections.iter().position(|s| s.id == id) {
        Some(pos) => Json(backend.sections.remove(pos)).into_response(),
        None => missing(&id),
    }
}

async fn fb_reorder(
    State(shared): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<ReorderRequest>,
) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    if let Some(unknown) = body.sections.iter().find(|o| !backend.sections.iter().any(|s| s.id == o.id)) {
        return missing(&unknown.id);
    }
    for entry in &body.sections {
        if let Some(section) = backend.sections.iter_mut().find(|s| s.id == entry.id) {
            section.order = entry.order;
        }
    }
    if let Some(status) = backend.reorder_status {
        return StatusCode::from_u16(status).unwrap_or(StatusCode::NO_CONTENT).into_response();
    }
    Json(json!({ "updated": body.sections.len() })).into_response()
}

async fn fb_save(State(shared): State<SharedBackend>, headers: HeaderMap, Json(body): Json<SaveHomepage>) -> Response {
    let mut backend = match record(&shared, &headers) {
        Ok(backend) => backend,
        Err(response) => return response,
    };
    backend.last_save = Some(body);
    Json(json!({ "success": true, "message": "Homepage saved successfully" })).into_response()
}

async fn fb_initialize(State(shared): State<SharedBackend>, headers: HeaderMap) -> Response {
    if let Err(response) = record(&shared, &headers) {
        return response;
    }
    Json(json!({ "message": "Default sections initialized" })).into_response()
}

async fn fb_stray(State(shared): State<SharedBackend>, uri: Uri) -> Response {
    let mut backend = shared.lock().expect("fake backend mutex poisoned");
    backend.stray_paths.push(uri.to_string());
    (StatusCode::NOT_FOUND, Json(json!({ "message": "no such route" }))).into_response()
}
