//! Read-only pages rendered from the current section list.

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use super::ProxyState;
use crate::codegen;
use crate::preview::render_preview;
use crate::repo::http::HttpSectionRepository;
use crate::repo::{RepoError, SectionRepository};
use crate::section::{ListFilter, Section, sort_by_order};

/// `GET /admin/homepage/preview` — live preview as an HTML page.
pub async fn preview(State(state): State<ProxyState>, headers: HeaderMap) -> Response {
    match fetch_sections(&state, &headers).await {
        Ok(sections) => Html(preview_document(&sections)).into_response(),
        Err(err) => {
            error!(error = %err, "preview render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to render preview: {err}")).into_response()
        }
    }
}

/// `GET /admin/homepage/code` — the code a save would write.
pub async fn code(State(state): State<ProxyState>, headers: HeaderMap) -> Response {
    match fetch_sections(&state, &headers).await {
        Ok(sections) => ([(CONTENT_TYPE, "text/plain; charset=utf-8")], codegen::generate(&sections)).into_response(),
        Err(err) => {
            error!(error = %err, "code preview failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to generate homepage code: {err}")).into_response()
        }
    }
}

pub(crate) fn preview_document(sections: &[Section]) -> String {
    format!(
        "<!doctype html>\n<html lang=\"vi\">\n<head><meta charset=\"utf-8\"><title>Homepage Preview</title></head>\n<body>\n{}</body>\n</html>\n",
        render_preview(sections)
    )
}

async fn fetch_sections(state: &ProxyState, headers: &HeaderMap) -> Result<Vec<Section>, RepoError> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let repo = HttpSectionRepository::with_client(state.http.clone(), &state.backend_url, authorization)?;
    let mut sections = repo.list(ListFilter::default()).await?;
    sort_by_order(&mut sections);
    Ok(sections)
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
