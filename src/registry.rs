//! Section registry — the fixed catalog of homepage templates.
//!
//! DESIGN
//! ======
//! Templates form a closed set. Adding one is a code change here, never a
//! runtime operation. `TemplateId::ALL` is also the canonical order used when
//! seeding or resetting the homepage. Component names coming back from the
//! backend are resolved through [`ComponentKind`] so an unknown name is a
//! value, not an error.

use std::fmt;

/// Identifier of a registry template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Hero,
    About,
    Events,
    News,
    Team,
    Gallery,
    Cta,
}

impl TemplateId {
    /// Every template, in canonical homepage order.
    pub const ALL: [Self; 7] = [
        Self::Hero,
        Self::About,
        Self::Events,
        Self::News,
        Self::Team,
        Self::Gallery,
        Self::Cta,
    ];

    /// Short palette identifier (`"hero"`, `"cta"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Events => "events",
            Self::News => "news",
            Self::Team => "team",
            Self::Gallery => "gallery",
            Self::Cta => "cta",
        }
    }

    /// Human-readable label shown in the "add section" palette.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hero => "Hero Section",
            Self::About => "About Section",
            Self::Events => "Events Section",
            Self::News => "News Section",
            Self::Team => "Team Section",
            Self::Gallery => "Gallery Section",
            Self::Cta => "CTA Section",
        }
    }

    /// Render-target name stored in `Section::component`.
    #[must_use]
    pub fn component_name(self) -> &'static str {
        match self {
            Self::Hero => "HeroSection",
            Self::About => "AboutSection",
            Self::Events => "EventsSection",
            Self::News => "NewsSection",
            Self::Team => "TeamSection",
            Self::Gallery => "GallerySection",
            Self::Cta => "CTASection",
        }
    }

    #[must_use]
    pub fn from_template_id(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    #[must_use]
    pub fn from_component(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.component_name() == raw)
    }

    #[must_use]
    pub fn template(self) -> Template {
        Template {
            template_id: self.as_str(),
            display_name: self.display_name(),
            component_name: self.component_name(),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry as presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub template_id: &'static str,
    pub display_name: &'static str,
    pub component_name: &'static str,
}

/// The full catalog in canonical order.
#[must_use]
pub fn templates() -> Vec<Template> {
    TemplateId::ALL.into_iter().map(TemplateId::template).collect()
}

// =============================================================================
// COMPONENT DISPATCH
// =============================================================================

/// A section's `component` field resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Known(TemplateId),
    Unknown(String),
}

impl ComponentKind {
    #[must_use]
    pub fn resolve(component: &str) -> Self {
        TemplateId::from_component(component).map_or_else(|| Self::Unknown(component.to_owned()), Self::Known)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
