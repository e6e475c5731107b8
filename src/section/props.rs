//! Typed template props.
//!
//! Each registry template reads a section's opaque `config` through its own
//! record. Missing keys fall back to the template defaults, extra keys are
//! ignored, and a key holding the wrong JSON type is an error.

use serde::Deserialize;
use serde_json::Value;

use super::SectionConfig;
use crate::registry::TemplateId;

#[derive(Debug, thiserror::Error)]
#[error("invalid {component} configuration: {source}")]
pub struct PropsError {
    pub component: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// A section's config interpreted by its template.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionProps {
    Hero(HeroProps),
    About(AboutProps),
    Events(EventsProps),
    News(NewsProps),
    Team(TeamProps),
    Gallery(GalleryProps),
    Cta(CtaProps),
}

impl SectionProps {
    /// Parse `config` with the record owned by `template`.
    ///
    /// # Errors
    ///
    /// Returns [`PropsError`] if a known key holds a value of the wrong type.
    pub fn parse(template: TemplateId, config: &SectionConfig) -> Result<Self, PropsError> {
        let value = Value::Object(config.clone());
        let wrap = |source: serde_json::Error| PropsError { component: template.component_name(), source };
        Ok(match template {
            TemplateId::Hero => Self::Hero(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::About => Self::About(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::Events => Self::Events(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::News => Self::News(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::Team => Self::Team(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::Gallery => Self::Gallery(serde_json::from_value(value).map_err(wrap)?),
            TemplateId::Cta => Self::Cta(serde_json::from_value(value).map_err(wrap)?),
        })
    }
}

// =============================================================================
// HERO
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroProps {
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
    pub primary_button_text: String,
    /// Empty hides the secondary button.
    pub secondary_button_text: String,
    pub show_animations: bool,
    pub show_organizer: bool,
}

impl Default for HeroProps {
    fn default() -> Self {
        Self {
            title: "CHUNG KẾT VIETNAM STUDENT MARATHON 2025".into(),
            subtitle: "Chạy chung kết Việt tương lai 2025".into(),
            background_image: "/img/image1.jpg".into(),
            primary_button_text: "Tham gia sự kiện".into(),
            secondary_button_text: "Xem video".into(),
            show_animations: true,
            show_organizer: true,
        }
    }
}

// =============================================================================
// ABOUT / EVENTS / NEWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutProps {
    pub title: String,
    pub description: String,
    pub image: String,
}

impl Default for AboutProps {
    fn default() -> Self {
        Self {
            title: "About Us".into(),
            description: "A student running community built around the national marathon finals.".into(),
            image: "/img/about.jpg".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventsProps {
    pub title: String,
    pub description: String,
    pub max_items: u32,
}

impl Default for EventsProps {
    fn default() -> Self {
        Self {
            title: "Upcoming Events".into(),
            description: "Races and training sessions open for registration.".into(),
            max_items: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsProps {
    pub title: String,
    pub description: String,
    pub max_items: u32,
}

impl Default for NewsProps {
    fn default() -> Self {
        Self {
            title: "Latest News".into(),
            description: "Announcements from the organizing committee.".into(),
            max_items: 3,
        }
    }
}

// =============================================================================
// TEAM
// =============================================================================

/// Built-in member card shown by the team template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub avatar: &'static str,
}

pub const TEAM_MEMBERS: [TeamMember; 4] = [
    TeamMember { name: "42KM – Marathon", role: "ĐĂNG KÝ NGAY", avatar: "/img/VSM/42km.png" },
    TeamMember { name: "21KM – Half Marathon", role: "ĐĂNG KÝ NGAY", avatar: "/img/VSM/21km.png" },
    TeamMember { name: "10KM - Nâng cao", role: "ĐĂNG KÝ NGAY", avatar: "/img/VSM/10km.png" },
    TeamMember { name: "5KM – Khởi đầu", role: "ĐĂNG KÝ NGAY", avatar: "/img/VSM/5km.png" },
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamProps {
    pub title: String,
    pub description: String,
    pub background_color: String,
    pub members_per_row: u32,
}

impl Default for TeamProps {
    fn default() -> Self {
        Self {
            title: "Đội ngũ VSM".into(),
            description: "Gặp gỡ những gương mặt tiêu biểu đồng hành cùng chúng tôi.".into(),
            background_color: "bg-muted/20".into(),
            members_per_row: 4,
        }
    }
}

// =============================================================================
// GALLERY / CTA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryProps {
    pub title: String,
    pub columns: u32,
    pub images: Vec<String>,
}

impl Default for GalleryProps {
    fn default() -> Self {
        Self {
            title: "Gallery".into(),
            columns: 3,
            images: vec!["/img/image1.jpg".into(), "/img/image2.jpg".into(), "/img/image3.jpg".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaProps {
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
}

impl Default for CtaProps {
    fn default() -> Self {
        Self {
            title: "Ready to run?".into(),
            description: "Pick a distance and join the finals.".into(),
            button_text: "Đăng ký ngay".into(),
            button_link: "/events".into(),
        }
    }
}

#[cfg(test)]
#[path = "props_test.rs"]
mod tests;
