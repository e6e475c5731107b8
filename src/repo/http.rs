//! HTTP section repository over `reqwest`.
//!
//! Talks to any base URL exposing the `/homepage-sections` routes: the
//! backend service itself, or this crate's proxy mounted under `/api`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{RepoError, SectionRepository};
use crate::config::HttpTimeouts;
use crate::section::{
    InitializeResult, ListFilter, ReorderRequest, SaveHomepage, SaveResult, Section, SectionDraft, SectionOrder,
    SectionPatch, is_addressable_id,
};

const SECTIONS_SEGMENT: &str = "homepage-sections";
const SECTIONS_PATH: &str = "/homepage-sections";

pub struct HttpSectionRepository {
    http: reqwest::Client,
    base_url: Url,
    authorization: Option<HeaderValue>,
}

impl HttpSectionRepository {
    /// Build a repository client. `authorization` is sent verbatim on every
    /// request when present.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::ClientBuild`] if the base URL or the credential
    /// is invalid, or the HTTP client cannot be constructed.
    pub fn new(base_url: &str, authorization: Option<&str>, timeouts: HttpTimeouts) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| RepoError::ClientBuild(e.to_string()))?;
        Self::with_client(http, base_url, authorization)
    }

    /// Build on top of an existing client (the proxy shares one).
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::ClientBuild`] if the base URL cannot carry a
    /// path or the credential is not a valid header value.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        authorization: Option<&str>,
    ) -> Result<Self, RepoError> {
        let authorization = authorization
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|e| RepoError::ClientBuild(format!("invalid authorization header: {e}")))?;
        let base_url =
            Url::parse(base_url).map_err(|e| RepoError::ClientBuild(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepoError::ClientBuild(format!("base URL {base_url} cannot carry a path")));
        }
        Ok(Self { http, base_url, authorization })
    }

    /// `{base}/homepage-sections/{segments...}`, each segment percent-encoded
    /// so `/`, `?` and `#` stay inside it.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(SECTIONS_SEGMENT).extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(segments));
        match &self.authorization {
            Some(value) => builder.header(AUTHORIZATION, value.clone()),
            None => builder,
        }
    }

    fn section_request(&self, method: Method, id: &str) -> Result<RequestBuilder, RepoError> {
        if !is_addressable_id(id) {
            return Err(RepoError::NotFound { resource: format!("section {id}") });
        }
        Ok(self.request(method, &[id]))
    }

    /// Send and return the raw body of a success response.
    async fn send(&self, builder: RequestBuilder, resource: &str) -> Result<String, RepoError> {
        let response = builder.send().await.map_err(|e| RepoError::Network(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| RepoError::Network(e.to_string()))?;
        debug!(status = status.as_u16(), %resource, "section service responded");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound { resource: resource.to_owned() });
        }
        if !status.is_success() {
            return Err(RepoError::Server { status: status.as_u16(), body });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, resource: &str) -> Result<T, RepoError> {
        let body = self.send(builder, resource).await?;
        serde_json::from_str(&body).map_err(|e| RepoError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SectionRepository for HttpSectionRepository {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Section>, RepoError> {
        let builder = self.request(Method::GET, &[]).query(&filter.query_pairs());
        self.send_json(builder, SECTIONS_PATH).await
    }

    async fn get(&self, id: &str) -> Result<Section, RepoError> {
        let builder = self.section_request(Method::GET, id)?;
        self.send_json(builder, &format!("section {id}")).await
    }

    async fn create(&self, draft: &SectionDraft) -> Result<Section, RepoError> {
        let builder = self.request(Method::POST, &[]).json(draft);
        self.send_json(builder, SECTIONS_PATH).await
    }

    async fn update(&self, id: &str, patch: &SectionPatch) -> Result<Section, RepoError> {
        let builder = self.section_request(Method::PUT, id)?.json(patch);
        self.send_json(builder, &format!("section {id}")).await
    }

    async fn delete(&self, id: &str) -> Result<Section, RepoError> {
        let builder = self.section_request(Method::DELETE, id)?;
        self.send_json(builder, &format!("section {id}")).await
    }

    async fn reorder(&self, orders: &[SectionOrder]) -> Result<(), RepoError> {
        let body = ReorderRequest { sections: orders.to_vec() };
        let builder = self.request(Method::POST, &["reorder"]).json(&body);
        self.send(builder, "section reorder").await.map(|_| ())
    }

    async fn save_rendering(&self, request: &SaveHomepage) -> Result<SaveResult, RepoError> {
        let builder = self.request(Method::POST, &["save-homepage"]).json(request);
        self.send_json(builder, "save-homepage").await
    }

    async fn initialize_defaults(&self) -> Result<InitializeResult, RepoError> {
        let builder = self.request(Method::POST, &["initialize"]);
        self.send_json(builder, "initialize").await
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
