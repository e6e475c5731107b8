//! Preview renderer — section list → WYSIWYG HTML.
//!
//! DESIGN
//! ======
//! Every section renders in list order, enabled or not. A known component is
//! rendered by its template with typed props parsed from `config`; an unknown
//! component or a config that fails to parse becomes a placeholder block, so
//! one bad record never breaks the rest of the page. Disabled sections keep
//! their slot and get a "Section Disabled" overlay. A summary panel (per
//! section visibility, totals, page structure) follows the page body.
//!
//! All interpolated text goes through [`escape_html`].

use crate::registry::ComponentKind;
use crate::section::Section;
use crate::section::props::{
    AboutProps, CtaProps, GalleryProps, HeroProps, SectionProps, TEAM_MEMBERS, TeamProps,
};

/// Card slots drawn for one events or news listing, whatever `maxItems` says.
const MAX_LISTING_SLOTS: u32 = 12;
/// Widest grid the team and gallery templates lay out.
const MAX_GRID_COLUMNS: u32 = 12;

/// Render the preview fragment for `sections` (normally the working view).
#[must_use]
pub fn render_preview(sections: &[Section]) -> String {
    let enabled = sections.iter().filter(|s| s.enabled).count();
    let mut out = String::new();

    out.push_str("<div class=\"homepage-preview\">\n");
    out.push_str(&format!(
        "<header class=\"preview-header\"><h2>Live Preview</h2><span class=\"badge\">{enabled} of {} sections enabled</span></header>\n",
        sections.len()
    ));
    out.push_str("<div class=\"preview-frame\">\n");
    for section in sections {
        out.push_str(&render_section(section));
    }
    if enabled == 0 {
        out.push_str(
            "<div class=\"preview-empty\"><h3>No sections enabled</h3><p>Enable some sections to see the preview</p></div>\n",
        );
    }
    out.push_str("</div>\n");
    out.push_str(&render_summary(sections));
    out.push_str("</div>\n");
    out
}

/// Escape text for HTML element and attribute content.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

// =============================================================================
// SECTION WRAPPER
// =============================================================================

fn render_section(section: &Section) -> String {
    let template = match ComponentKind::resolve(&section.component) {
        ComponentKind::Known(template) => template,
        ComponentKind::Unknown(name) => {
            return placeholder(section, &format!("Component {name} not found"));
        }
    };
    let body = match SectionProps::parse(template, &section.config) {
        Ok(props) => render_props(&props),
        Err(err) => {
            return placeholder(section, &format!("Invalid configuration for {}: {}", err.component, err.source));
        }
    };

    let mut out = format!(
        "<div class=\"preview-section\" data-section-id=\"{}\">\n",
        escape_html(&section.id)
    );
    if !section.enabled {
        out.push_str("<div class=\"preview-overlay\"><span>Section Disabled</span></div>\n");
    }
    out.push_str(&format!("<span class=\"preview-label\">{}</span>\n", escape_html(&section.name)));
    let inert = if section.enabled { "" } else { " pointer-events-none" };
    out.push_str(&format!("<div class=\"preview-body{inert}\">\n{body}</div>\n"));
    out.push_str("</div>\n");
    out
}

fn placeholder(section: &Section, message: &str) -> String {
    format!(
        "<div class=\"preview-placeholder\" data-section-id=\"{}\"><p>{}</p></div>\n",
        escape_html(&section.id),
        escape_html(message)
    )
}

fn render_props(props: &SectionProps) -> String {
    match props {
        SectionProps::Hero(p) => render_hero(p),
        SectionProps::About(p) => render_about(p),
        SectionProps::Events(p) => render_listing("events", &p.title, &p.description, p.max_items),
        SectionProps::News(p) => render_listing("news", &p.title, &p.description, p.max_items),
        SectionProps::Team(p) => render_team(p),
        SectionProps::Gallery(p) => render_gallery(p),
        SectionProps::Cta(p) => render_cta(p),
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Split a hero title into lead (first two words), middle, and highlighted
/// tail (last three words). Short titles repeat words across parts.
fn split_title(title: &str) -> (String, String, String) {
    let words: Vec<&str> = title.split(' ').collect();
    let len = words.len();
    let lead = words[..len.min(2)].join(" ");
    let tail_start = len.saturating_sub(3);
    let middle = if tail_start > 2 { words[2..tail_start].join(" ") } else { String::new() };
    let tail = words[tail_start..].join(" ");
    (lead, middle, tail)
}

fn render_hero(p: &HeroProps) -> String {
    let (lead, middle, tail) = split_title(&p.title);
    let animated = if p.show_animations { " animated" } else { "" };
    let mut out = format!(
        "<section class=\"hero{animated}\" style=\"background-image: url('{}')\">\n",
        escape_html(&p.background_image)
    );
    out.push_str(&format!(
        "<h1>{}<span>{}</span><span class=\"gradient-text\">{}</span></h1>\n",
        escape_html(&lead),
        escape_html(&middle),
        escape_html(&tail)
    ));
    out.push_str(&format!("<p>{}</p>\n", escape_html(&p.subtitle)));
    if p.show_organizer {
        out.push_str("<div class=\"organizer\"><p>Đơn vị tổ chức</p><img src=\"/img/logo-vsm.png\" alt=\"VNExpress\"></div>\n");
    }
    out.push_str(&format!("<a class=\"button primary\" href=\"/events\">{}</a>\n", escape_html(&p.primary_button_text)));
    if !p.secondary_button_text.is_empty() {
        out.push_str(&format!(
            "<a class=\"button outline\" href=\"/video\">{}</a>\n",
            escape_html(&p.secondary_button_text)
        ));
    }
    out.push_str("</section>\n");
    out
}

fn render_about(p: &AboutProps) -> String {
    format!(
        "<section class=\"about\">\n<h2>{}</h2>\n<p>{}</p>\n<img src=\"{}\" alt=\"{}\">\n</section>\n",
        escape_html(&p.title),
        escape_html(&p.description),
        escape_html(&p.image),
        escape_html(&p.title)
    )
}

/// Events and news share a layout: heading plus `max_items` card slots.
fn render_listing(kind: &str, title: &str, description: &str, max_items: u32) -> String {
    let mut out = format!(
        "<section class=\"{kind}\" data-max-items=\"{max_items}\">\n<h2>{}</h2>\n<p>{}</p>\n<ul>\n",
        escape_html(title),
        escape_html(description)
    );
    for slot in 1..=max_items.min(MAX_LISTING_SLOTS) {
        out.push_str(&format!("<li class=\"card-slot\">#{slot}</li>\n"));
    }
    out.push_str("</ul>\n</section>\n");
    out
}

fn render_team(p: &TeamProps) -> String {
    let mut out = format!(
        "<section class=\"team {}\">\n<h2>{}</h2>\n<p>{}</p>\n<div class=\"grid grid-cols-2 md:grid-cols-{}\">\n",
        escape_html(&p.background_color),
        escape_html(&p.title),
        escape_html(&p.description),
        p.members_per_row.clamp(1, MAX_GRID_COLUMNS)
    );
    for member in &TEAM_MEMBERS {
        out.push_str(&format!(
            "<div class=\"card\"><img src=\"{}\" alt=\"{}\"><h3>{}</h3><p>{}</p></div>\n",
            escape_html(member.avatar),
            escape_html(member.name),
            escape_html(member.name),
            escape_html(member.role)
        ));
    }
    out.push_str("</div>\n</section>\n");
    out
}

fn render_gallery(p: &GalleryProps) -> String {
    let mut out = format!(
        "<section class=\"gallery\">\n<h2>{}</h2>\n<div class=\"grid grid-cols-{}\">\n",
        escape_html(&p.title),
        p.columns.clamp(1, MAX_GRID_COLUMNS)
    );
    for image in &p.images {
        out.push_str(&format!("<img src=\"{}\" alt=\"\">\n", escape_html(image)));
    }
    out.push_str("</div>\n</section>\n");
    out
}

fn render_cta(p: &CtaProps) -> String {
    format!(
        "<section class=\"cta\">\n<h2>{}</h2>\n<p>{}</p>\n<a class=\"button primary\" href=\"{}\">{}</a>\n</section>\n",
        escape_html(&p.title),
        escape_html(&p.description),
        escape_html(&p.button_link),
        escape_html(&p.button_text)
    )
}

// =============================================================================
// SUMMARY PANEL
// =============================================================================

fn render_summary(sections: &[Section]) -> String {
    let enabled: Vec<&Section> = sections.iter().filter(|s| s.enabled).collect();
    let mut out = String::from("<div class=\"preview-summary\">\n");

    out.push_str("<div class=\"card\"><h4>Section Summary</h4><ul>\n");
    for section in sections {
        let (class, state) = if section.enabled { ("", "visible") } else { (" class=\"line-through\"", "hidden") };
        out.push_str(&format!(
            "<li><span{class}>{}</span> <small>{state}</small></li>\n",
            escape_html(&section.name)
        ));
    }
    out.push_str("</ul></div>\n");

    out.push_str(&format!(
        "<div class=\"card\"><h4>Performance</h4>\n<p>Total Sections: {}</p>\n<p>Enabled: {}</p>\n<p>Disabled: {}</p>\n</div>\n",
        sections.len(),
        enabled.len(),
        sections.len() - enabled.len()
    ));

    out.push_str("<div class=\"card\"><h4>Page Structure</h4>\n<p>Navbar (Fixed)</p>\n");
    for (index, section) in enabled.iter().enumerate() {
        out.push_str(&format!("<p>{}. {}</p>\n", index + 1, escape_html(&section.name)));
    }
    out.push_str("<p>Footer (Fixed)</p>\n</div>\n");

    out.push_str("</div>\n");
    out
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
