//! Section repository — the remote CRUD service seen from this crate.
//!
//! DESIGN
//! ======
//! [`SectionRepository`] is the seam between the manager and the network so
//! the manager can be driven by an in-memory fake in tests. The production
//! implementation is [`http::HttpSectionRepository`]. Calls are never
//! retried here; the manager decides what to do with a failure.

pub mod http;

use crate::section::{
    InitializeResult, ListFilter, SaveHomepage, SaveResult, Section, SectionDraft, SectionOrder, SectionPatch,
};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by repository calls.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Transport or connectivity failure (connect refused, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status other than 404.
    #[error("server error: status {status}: {body}")]
    Server { status: u16, body: String },

    /// The service does not know the addressed resource.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// A success response whose body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl RepoError {
    /// True for the failures that make `load` try the default seed.
    #[must_use]
    pub fn is_missing_or_unreachable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Network(_))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait SectionRepository: Send + Sync {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Section>, RepoError>;

    async fn get(&self, id: &str) -> Result<Section, RepoError>;

    async fn create(&self, draft: &SectionDraft) -> Result<Section, RepoError>;

    async fn update(&self, id: &str, patch: &SectionPatch) -> Result<Section, RepoError>;

    /// Returns the deleted record.
    async fn delete(&self, id: &str) -> Result<Section, RepoError>;

    /// Bulk rank rewrite. Fails if any id is unknown.
    async fn reorder(&self, orders: &[SectionOrder]) -> Result<(), RepoError>;

    /// Persist generated homepage code. A deployable asset changes on success.
    async fn save_rendering(&self, request: &SaveHomepage) -> Result<SaveResult, RepoError>;

    /// Idempotent default seed for an empty section set.
    async fn initialize_defaults(&self) -> Result<InitializeResult, RepoError>;
}

#[cfg(test)]
pub(crate) mod test_helpers;
