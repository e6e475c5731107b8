//! Code generator — enabled sections to homepage assembly source.
//!
//! DESIGN
//! ======
//! Pure and deterministic: the generated file is committed and diffed
//! downstream, so identical input must always yield byte-identical output.
//! Sections are filtered to enabled, stable-sorted by `order`, and emitted
//! as one import per distinct component plus one element per section inside
//! a fixed navbar/main/footer wrapper.

use std::collections::HashSet;

use crate::section::Section;

const COMPONENT_MODULE_PREFIX: &str = "@/components/home/";
const ELEMENT_INDENT: &str = "        ";

/// Module path for a section component.
///
/// Lowercases the name and inserts a hyphen before the first `section`
/// token: `HeroSection` → `@/components/home/hero-section`.
#[must_use]
pub fn component_module_path(component: &str) -> String {
    let lowered = component.to_lowercase().replacen("section", "-section", 1);
    format!("{COMPONENT_MODULE_PREFIX}{lowered}")
}

/// Enabled sections in render order.
#[must_use]
pub fn render_order(sections: &[Section]) -> Vec<&Section> {
    let mut enabled: Vec<&Section> = sections.iter().filter(|s| s.enabled).collect();
    enabled.sort_by_key(|s| s.order);
    enabled
}

/// Generate the homepage source for `sections`.
#[must_use]
pub fn generate(sections: &[Section]) -> String {
    let ordered = render_order(sections);

    let mut seen = HashSet::new();
    let mut out = String::from("import { Navbar } from \"@/components/layout/navbar\"\n");
    for section in &ordered {
        if seen.insert(section.component.as_str()) {
            out.push_str(&format!(
                "import {{ {} }} from \"{}\"\n",
                section.component,
                component_module_path(&section.component)
            ));
        }
    }
    out.push_str("import { Footer } from \"@/components/layout/footer\"\n");
    out.push('\n');
    out.push_str("export default function HomePage() {\n");
    out.push_str("  return (\n");
    out.push_str("    <div className=\"min-h-screen\">\n");
    out.push_str("      <Navbar />\n");
    out.push_str("      <main>\n");
    for section in &ordered {
        out.push_str(&format!("{ELEMENT_INDENT}<{} />\n", section.component));
    }
    out.push_str("      </main>\n");
    out.push_str("      <Footer />\n");
    out.push_str("    </div>\n");
    out.push_str("  )\n");
    out.push('}');
    out
}

#[cfg(test)]
#[path = "codegen_test.rs"]
mod tests;
