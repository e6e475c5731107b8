//! Section manager — the controller behind the homepage admin console.
//!
//! DESIGN
//! ======
//! The manager owns two views of the section list: `sections`, the last
//! state confirmed by (or optimistically sent to) the section service, and
//! `preview_sections`, the working copy used for live edits that have not
//! been committed. Both are private and only change through the operations
//! below. A `dirty` flag tracks whether the generated homepage is behind the
//! section list; only a confirmed save clears it.
//!
//! Every operation pushes user-facing [`Notice`]s that the front end drains
//! and displays, and logs through `tracing`.
//!
//! ERROR HANDLING
//! ==============
//! Confirm-then-apply operations (reorder, toggle, add, remove) touch local
//! state only after the service accepts the change, so a failure leaves the
//! views untouched. `update` is optimistic: it commits tentatively, and on a
//! failed write reloads the authoritative list; if the reload fails too the
//! tentative commit is rolled back from its snapshot.
//!
//! Reset and per-section reorder are multi-call sequences with no
//! compensating transaction. A failure after at least one remote mutation
//! is reported as [`ManagerError::PartialFailure`], never as a clean failure,
//! and the views are reloaded best-effort so they match what the service
//! now holds.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::codegen;
use crate::config::ReorderMode;
use crate::registry::TemplateId;
use crate::repo::{RepoError, SectionRepository};
use crate::section::{
    ListFilter, SaveHomepage, Section, SectionConfig, SectionDraft, SectionOrder, SectionPatch, sort_by_order,
};

const SAVE_RELOAD_HINT: &str = "The homepage has been updated. Reload the page to show the changes.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("reorder must list every current section exactly once")]
    ReorderMismatch,

    #[error("save rejected: {0}")]
    SaveRejected(String),

    #[error("{operation} partially applied ({completed} of {total} remote calls succeeded): {source}")]
    PartialFailure {
        operation: &'static str,
        completed: usize,
        total: usize,
        #[source]
        source: RepoError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing message produced by an operation (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub description: Option<String>,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into(), description: None }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into(), description: None }
    }

    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Target path sent with every save.
    pub homepage_file_path: String,
    pub reorder_mode: ReorderMode,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            homepage_file_path: crate::config::DEFAULT_HOMEPAGE_FILE_PATH.to_owned(),
            reorder_mode: ReorderMode::Bulk,
        }
    }
}

/// Result of a confirmed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub message: String,
    /// The generated file replaced a live artifact; the rendered surface
    /// must be reloaded to show it.
    pub reload_required: bool,
}

/// One row of the "sections to be saved" summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummaryEntry {
    /// 1-based rank shown to the operator.
    pub position: i64,
    pub name: String,
    pub component: String,
    pub configured_keys: Vec<String>,
}

/// Snapshot taken before a tentative local commit.
///
/// `capture` then mutate; on confirmation drop the snapshot, on failure
/// `restore` it.
#[derive(Debug, Clone)]
pub(crate) struct Tentative {
    sections: Vec<Section>,
    preview_sections: Vec<Section>,
    dirty: bool,
}

impl Tentative {
    fn capture(manager: &SectionManager) -> Self {
        Self {
            sections: manager.sections.clone(),
            preview_sections: manager.preview_sections.clone(),
            dirty: manager.dirty,
        }
    }

    fn restore(self, manager: &mut SectionManager) {
        manager.sections = self.sections;
        manager.preview_sections = self.preview_sections;
        manager.dirty = self.dirty;
    }
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct SectionManager {
    repo: Arc<dyn SectionRepository>,
    options: ManagerOptions,
    sections: Vec<Section>,
    preview_sections: Vec<Section>,
    dirty: bool,
    notices: Vec<Notice>,
}

impl SectionManager {
    #[must_use]
    pub fn new(repo: Arc<dyn SectionRepository>, options: ManagerOptions) -> Self {
        Self {
            repo,
            options,
            sections: Vec::new(),
            preview_sections: Vec::new(),
            dirty: false,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn preview_sections(&self) -> &[Section] {
        &self.preview_sections
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.sections.iter().filter(|s| s.enabled).count()
    }

    /// Take every notice pushed since the last drain.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The code a save would write, from the authoritative view.
    #[must_use]
    pub fn generated_code(&self) -> String {
        codegen::generate(&self.sections)
    }

    /// Enabled sections in render order, as shown before saving.
    #[must_use]
    pub fn save_summary(&self) -> Vec<SaveSummaryEntry> {
        codegen::render_order(&self.sections)
            .into_iter()
            .map(|s| SaveSummaryEntry {
                position: s.order + 1,
                name: s.name.clone(),
                component: s.component.clone(),
                configured_keys: s.configured_keys().into_iter().map(str::to_owned).collect(),
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // LOAD
    // -------------------------------------------------------------------------

    /// Fetch the full list and replace both views.
    ///
    /// When the list is missing or the service is unreachable, seeds the
    /// defaults once and fetches once more.
    ///
    /// # Errors
    ///
    /// Returns the list error, or the seed/refetch error after a fallback.
    pub async fn load(&mut self) -> Result<(), ManagerError> {
        match self.repo.list(ListFilter::default()).await {
            Ok(sections) => {
                info!(count = sections.len(), "sections loaded");
                self.replace_views(sections);
                Ok(())
            }
            Err(err) if err.is_missing_or_unreachable() => {
                warn!(error = %err, "section list unavailable; initializing defaults");
                self.notify(Notice::error("Failed to load sections").with_description(err.to_string()));
                match self.seed_and_refetch().await {
                    Ok(sections) => {
                        info!(count = sections.len(), "default sections initialized");
                        self.replace_views(sections);
                        self.notify(Notice::success("Default sections initialized"));
                        Ok(())
                    }
                    Err(seed_err) => {
                        warn!(error = %seed_err, "default section initialization failed");
                        self.notify(
                            Notice::error("Failed to initialize default sections")
                                .with_description(seed_err.to_string()),
                        );
                        Err(seed_err.into())
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "section list failed");
                self.notify(Notice::error("Failed to load sections").with_description(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Read-only filtered listing straight from the service. Neither view
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn fetch(&self, filter: ListFilter) -> Result<Vec<Section>, ManagerError> {
        Ok(self.repo.list(filter).await?)
    }

    async fn seed_and_refetch(&self) -> Result<Vec<Section>, RepoError> {
        let seeded = self.repo.initialize_defaults().await?;
        info!(message = %seeded.message, "section service seeded");
        self.repo.list(ListFilter::default()).await
    }

    // -------------------------------------------------------------------------
    // REORDER
    // -------------------------------------------------------------------------

    /// Rewrite every rank to its 0-based position in `ids`.
    ///
    /// # Errors
    ///
    /// Validation errors before any remote call; repository errors leave the
    /// views unchanged; [`ManagerError::PartialFailure`] in per-section mode
    /// when some ranks were already written.
    pub async fn reorder(&mut self, ids: &[String]) -> Result<(), ManagerError> {
        let result = self.reorder_inner(ids).await;
        self.finish(result, "Sections reordered", "Failed to reorder sections")
    }

    async fn reorder_inner(&mut self, ids: &[String]) -> Result<(), ManagerError> {
        let reordered = self.reordered_list(ids)?;
        let orders: Vec<SectionOrder> =
            reordered.iter().map(|s| SectionOrder { id: s.id.clone(), order: s.order }).collect();

        match self.options.reorder_mode {
            ReorderMode::Bulk => self.repo.reorder(&orders).await?,
            ReorderMode::PerSection => self.reorder_per_section(&orders).await?,
        }

        info!(count = reordered.len(), "sections reordered");
        self.sections.clone_from(&reordered);
        self.preview_sections = reordered;
        self.dirty = true;
        Ok(())
    }

    /// Validate `ids` against the current list and build the reordered list.
    fn reordered_list(&self, ids: &[String]) -> Result<Vec<Section>, ManagerError> {
        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                return Err(ManagerError::ReorderMismatch);
            }
            let mut section = self
                .sections
                .iter()
                .find(|s| &s.id == id)
                .cloned()
                .ok_or_else(|| ManagerError::UnknownSection(id.clone()))?;
            section.order = i64::try_from(position).unwrap_or(i64::MAX);
            reordered.push(section);
        }
        if reordered.len() != self.sections.len() {
            return Err(ManagerError::ReorderMismatch);
        }
        Ok(reordered)
    }

    async fn reorder_per_section(&mut self, orders: &[SectionOrder]) -> Result<(), ManagerError> {
        let changed: Vec<&SectionOrder> = orders
            .iter()
            .filter(|o| self.sections.iter().any(|s| s.id == o.id && s.order != o.order))
            .collect();
        let total = changed.len();
        for (completed, entry) in changed.into_iter().enumerate() {
            if let Err(err) = self.repo.update(&entry.id, &SectionPatch::order(entry.order)).await {
                return Err(self.partial_or_clean("reorder", completed, total, err).await);
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // TOGGLE / ADD / REMOVE
    // -------------------------------------------------------------------------

    /// Flip `enabled` for one section once the service confirms it.
    ///
    /// # Errors
    ///
    /// [`ManagerError::UnknownSection`] or the repository error; local state
    /// is unchanged on failure.
    pub async fn toggle(&mut self, id: &str) -> Result<(), ManagerError> {
        let result = self.toggle_inner(id).await;
        self.finish(result, "Section visibility updated", "Failed to update section visibility")
    }

    async fn toggle_inner(&mut self, id: &str) -> Result<(), ManagerError> {
        let enabled = self
            .sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| !s.enabled)
            .ok_or_else(|| ManagerError::UnknownSection(id.to_owned()))?;

        self.repo.update(id, &SectionPatch::enabled(enabled)).await?;

        for section in self.sections.iter_mut().chain(self.preview_sections.iter_mut()) {
            if section.id == id {
                section.enabled = enabled;
            }
        }
        self.dirty = true;
        info!(%id, enabled, "section toggled");
        Ok(())
    }

    /// Create a section from a registry template at the end of the list.
    ///
    /// # Errors
    ///
    /// [`ManagerError::UnknownTemplate`] without a remote call, or the
    /// repository error.
    pub async fn add(&mut self, template_id: &str) -> Result<Section, ManagerError> {
        let result = self.add_inner(template_id).await;
        self.finish(result, "Section added", "Failed to add section")
    }

    async fn add_inner(&mut self, template_id: &str) -> Result<Section, ManagerError> {
        let template = TemplateId::from_template_id(template_id)
            .ok_or_else(|| ManagerError::UnknownTemplate(template_id.to_owned()))?;
        let order = self.sections.iter().map(|s| s.order).max().map_or(0, |max| max + 1);
        let draft = SectionDraft {
            name: template.display_name().to_owned(),
            component: template.component_name().to_owned(),
            enabled: true,
            config: SectionConfig::new(),
            order,
            author_id: None,
        };

        let created = self.repo.create(&draft).await?;
        info!(id = %created.id, template = %template, order, "section added");
        self.sections.push(created.clone());
        self.preview_sections.push(created.clone());
        self.dirty = true;
        Ok(created)
    }

    /// Delete a section and drop it from both views.
    ///
    /// # Errors
    ///
    /// Returns the repository error; local state is unchanged on failure.
    pub async fn remove(&mut self, id: &str) -> Result<(), ManagerError> {
        let result = self.remove_inner(id).await;
        self.finish(result, "Section removed", "Failed to remove section")
    }

    async fn remove_inner(&mut self, id: &str) -> Result<(), ManagerError> {
        self.repo.delete(id).await?;
        self.sections.retain(|s| s.id != id);
        self.preview_sections.retain(|s| s.id != id);
        self.dirty = true;
        info!(%id, "section removed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // CONFIG EDITS
    // -------------------------------------------------------------------------

    /// Replace a section's config optimistically, then persist it.
    ///
    /// # Errors
    ///
    /// [`ManagerError::UnknownSection`] before any change, or the write
    /// error after the optimistic commit has been compensated.
    pub async fn update(&mut self, id: &str, config: SectionConfig) -> Result<(), ManagerError> {
        let result = self.update_inner(id, config).await;
        self.finish(result, "Section updated", "Failed to update section")
    }

    async fn update_inner(&mut self, id: &str, config: SectionConfig) -> Result<(), ManagerError> {
        if !self.sections.iter().any(|s| s.id == id) {
            return Err(ManagerError::UnknownSection(id.to_owned()));
        }

        let tentative = Tentative::capture(self);
        for section in self.sections.iter_mut().chain(self.preview_sections.iter_mut()) {
            if section.id == id {
                section.config.clone_from(&config);
            }
        }
        self.dirty = true;

        match self.repo.update(id, &SectionPatch::config(config)).await {
            Ok(_) => {
                info!(%id, "section config updated");
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "section config write failed; reloading");
                self.compensate(tentative).await;
                Err(err.into())
            }
        }
    }

    /// Discard a failed tentative commit: reload from the service, or roll
    /// back to the snapshot when the reload fails as well.
    async fn compensate(&mut self, tentative: Tentative) {
        match self.repo.list(ListFilter::default()).await {
            Ok(sections) => {
                self.replace_views(sections);
                self.dirty = tentative.dirty;
            }
            Err(err) => {
                warn!(error = %err, "reload after failed write failed; rolling back locally");
                tentative.restore(self);
            }
        }
    }

    /// Apply a config to the working view only.
    ///
    /// # Errors
    ///
    /// [`ManagerError::UnknownSection`] if the working view lacks `id`.
    pub fn preview_only(&mut self, id: &str, config: SectionConfig) -> Result<(), ManagerError> {
        let section = self
            .preview_sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ManagerError::UnknownSection(id.to_owned()))?;
        section.config = config;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // RESET / SAVE
    // -------------------------------------------------------------------------

    /// Delete every stored section, then recreate the canonical template set.
    ///
    /// # Errors
    ///
    /// A repository error when nothing was changed remotely, otherwise
    /// [`ManagerError::PartialFailure`].
    pub async fn reset_to_default(&mut self) -> Result<(), ManagerError> {
        let result = self.reset_inner().await;
        self.finish(result, "Reset to default configuration", "Failed to reset to default")
    }

    async fn reset_inner(&mut self) -> Result<(), ManagerError> {
        let existing = self.repo.list(ListFilter::default()).await?;
        let total = existing.len() + TemplateId::ALL.len();
        let mut completed = 0;

        for section in &existing {
            if let Err(err) = self.repo.delete(&section.id).await {
                return Err(self.partial_or_clean("reset to default", completed, total, err).await);
            }
            completed += 1;
        }

        let mut created = Vec::with_capacity(TemplateId::ALL.len());
        for (index, template) in TemplateId::ALL.into_iter().enumerate() {
            let draft = SectionDraft {
                name: template.display_name().to_owned(),
                component: template.component_name().to_owned(),
                enabled: true,
                config: SectionConfig::new(),
                order: i64::try_from(index).unwrap_or(i64::MAX),
                author_id: None,
            };
            match self.repo.create(&draft).await {
                Ok(section) => created.push(section),
                Err(err) => return Err(self.partial_or_clean("reset to default", completed, total, err).await),
            }
            completed += 1;
        }

        info!(deleted = existing.len(), created = created.len(), "sections reset to default");
        self.replace_views(created);
        self.dirty = true;
        Ok(())
    }

    /// Generate the homepage from the authoritative view and persist it.
    ///
    /// # Errors
    ///
    /// The repository error, or [`ManagerError::SaveRejected`] when the
    /// service answers `success: false`. The dirty flag is kept on failure.
    pub async fn save(&mut self) -> Result<SaveOutcome, ManagerError> {
        let result = self.save_inner().await;
        match &result {
            Ok(outcome) => {
                self.notify(Notice::success(outcome.message.clone()).with_description(SAVE_RELOAD_HINT));
            }
            Err(err) => {
                warn!(error = %err, "homepage save failed");
                self.notify(Notice::error("Failed to save homepage").with_description(err.to_string()));
            }
        }
        result
    }

    async fn save_inner(&mut self) -> Result<SaveOutcome, ManagerError> {
        let request = SaveHomepage {
            content: codegen::generate(&self.sections),
            file_path: Some(self.options.homepage_file_path.clone()),
            enabled_section_ids: Some(codegen::render_order(&self.sections).iter().map(|s| s.id.clone()).collect()),
        };

        let result = self.repo.save_rendering(&request).await?;
        if !result.success {
            let message = if result.message.is_empty() { "Failed to save".to_owned() } else { result.message };
            return Err(ManagerError::SaveRejected(message));
        }

        info!(path = %self.options.homepage_file_path, "homepage saved");
        self.dirty = false;
        Ok(SaveOutcome { message: result.message, reload_required: true })
    }

    // -------------------------------------------------------------------------
    // HELPERS
    // -------------------------------------------------------------------------

    fn replace_views(&mut self, mut sections: Vec<Section>) {
        sort_by_order(&mut sections);
        self.preview_sections.clone_from(&sections);
        self.sections = sections;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Push the notice matching `result` and pass it through.
    fn finish<T>(&mut self, result: Result<T, ManagerError>, success: &str, failure: &str) -> Result<T, ManagerError> {
        match &result {
            Ok(_) => self.notify(Notice::success(success)),
            Err(err @ ManagerError::PartialFailure { .. }) => {
                warn!(error = %err, "{failure}: partially applied");
                let notice = Notice::error(format!("{failure}: changes were only partially applied"))
                    .with_description(err.to_string());
                self.notify(notice);
            }
            Err(err) => {
                warn!(error = %err, "{failure}");
                self.notify(Notice::error(failure).with_description(err.to_string()));
            }
        }
        result
    }

    /// Classify a mid-sequence failure. With nothing applied remotely it is a
    /// clean failure; otherwise the views are reloaded best-effort and the
    /// failure is reported as partial.
    async fn partial_or_clean(
        &mut self,
        operation: &'static str,
        completed: usize,
        total: usize,
        err: RepoError,
    ) -> ManagerError {
        if completed == 0 {
            return ManagerError::Repo(err);
        }
        match self.repo.list(ListFilter::default()).await {
            Ok(sections) => self.replace_views(sections),
            Err(reload_err) => warn!(error = %reload_err, operation, "reload after partial failure failed"),
        }
        self.dirty = true;
        ManagerError::PartialFailure { operation, completed, total, source: err }
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
