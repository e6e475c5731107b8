//! Section records — the wire model shared by the repository client, the
//! manager, the code generator and the preview renderer.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. `config` stays an opaque
//! JSON object here; templates interpret it through [`props::SectionProps`].
//! Timestamps are kept as the backend's strings since nothing in this crate
//! does date arithmetic on them.

pub mod props;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque per-section configuration object.
pub type SectionConfig = Map<String, Value>;

// =============================================================================
// SECTION
// =============================================================================

/// Attribution attached to a section by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// One configurable, orderable block of homepage content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub component: String,
    pub enabled: bool,
    #[serde(default)]
    pub config: SectionConfig,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Section {
    /// Keys present in `config`, in map order. Used for display only.
    #[must_use]
    pub fn configured_keys(&self) -> Vec<&str> {
        self.config.keys().map(String::as_str).collect()
    }
}

/// Stable sort by `order`. Ties keep their arrival order.
pub fn sort_by_order(sections: &mut [Section]) {
    sections.sort_by_key(|s| s.order);
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Create body. The backend assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    pub name: String,
    pub component: String,
    pub enabled: bool,
    pub config: SectionConfig,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

/// Partial update body. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SectionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl SectionPatch {
    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self { enabled: Some(enabled), ..Self::default() }
    }

    #[must_use]
    pub fn config(config: SectionConfig) -> Self {
        Self { config: Some(config), ..Self::default() }
    }

    #[must_use]
    pub fn order(order: i64) -> Self {
        Self { order: Some(order), ..Self::default() }
    }

    /// Apply the present fields to a record. Used by in-memory stores.
    #[cfg(test)]
    pub fn apply_to(&self, section: &mut Section) {
        if let Some(name) = &self.name {
            section.name.clone_from(name);
        }
        if let Some(component) = &self.component {
            section.component.clone_from(component);
        }
        if let Some(enabled) = self.enabled {
            section.enabled = enabled;
        }
        if let Some(config) = &self.config {
            section.config.clone_from(config);
        }
        if let Some(order) = self.order {
            section.order = order;
        }
    }
}

/// Whether `id` can travel as one URL path segment. `.` and `..` would be
/// resolved as relative steps, so no request is built for them.
#[must_use]
pub fn is_addressable_id(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}

/// One entry of a bulk rank rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOrder {
    pub id: String,
    pub order: i64,
}

/// Body of `POST /homepage-sections/reorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub sections: Vec<SectionOrder>,
}

/// Body of `POST /homepage-sections/save-homepage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHomepage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_section_ids: Option<Vec<String>>,
}

/// Backend answer to a save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Backend answer to the default-seed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// LIST FILTER
// =============================================================================

/// Server-side sort key for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Order,
    Name,
    CreatedAt,
}

impl OrderBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Optional filters for `list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub enabled: Option<bool>,
    pub order_by: Option<OrderBy>,
}

impl ListFilter {
    /// Query pairs in a fixed order, empty when no filter is set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(enabled) = self.enabled {
            pairs.push(("enabled", enabled.to_string()));
        }
        if let Some(order_by) = self.order_by {
            pairs.push(("orderBy", order_by.as_str().to_owned()));
        }
        pairs
    }
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
