use super::*;
use crate::repo::test_helpers::{FakeBackend, spawn_fake_backend};
use crate::routes::test_helpers::spawn_proxy;
use crate::section::test_helpers::section;

fn backend_sections() -> Vec<Section> {
    vec![
        section("b", "AboutSection", 1, true),
        section("a", "HeroSection", 0, true),
        section("c", "TeamSection", 2, false),
    ]
}

#[tokio::test]
async fn preview_page_renders_html() {
    let backend = FakeBackend { sections: backend_sections(), ..FakeBackend::default() };
    let (backend, shared) = spawn_fake_backend(backend).await;
    let proxy = spawn_proxy(&backend).await;

    let response = reqwest::Client::new()
        .get(format!("{proxy}/admin/homepage/preview"))
        .header("Authorization", "Bearer page")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains("2 of 3 sections enabled"));
    assert!(html.contains("Section Disabled"));
    assert_eq!(shared.lock().unwrap().last_authorization.as_deref(), Some("Bearer page"));
}

#[tokio::test]
async fn code_page_returns_generated_source() {
    let backend = FakeBackend { sections: backend_sections(), ..FakeBackend::default() };
    let (backend, _shared) = spawn_fake_backend(backend).await;
    let proxy = spawn_proxy(&backend).await;

    let response = reqwest::get(format!("{proxy}/admin/homepage/code")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    let code = response.text().await.unwrap();
    let mut expected = backend_sections();
    sort_by_order(&mut expected);
    assert_eq!(code, codegen::generate(&expected));
    assert!(code.find("<HeroSection />").unwrap() < code.find("<AboutSection />").unwrap());
    assert!(!code.contains("TeamSection"));
}

#[tokio::test]
async fn pages_report_upstream_failure_as_500() {
    let backend = FakeBackend { fail_status: Some(500), ..FakeBackend::default() };
    let (backend, _shared) = spawn_fake_backend(backend).await;
    let proxy = spawn_proxy(&backend).await;

    let preview = reqwest::get(format!("{proxy}/admin/homepage/preview")).await.unwrap();
    assert_eq!(preview.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(preview.text().await.unwrap().starts_with("Failed to render preview"));

    let code = reqwest::get(format!("{proxy}/admin/homepage/code")).await.unwrap();
    assert_eq!(code.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn preview_document_wraps_fragment() {
    let doc = preview_document(&[]);
    assert!(doc.contains("<title>Homepage Preview</title>"));
    assert!(doc.contains("No sections enabled"));
    assert!(doc.trim_end().ends_with("</html>"));
}
