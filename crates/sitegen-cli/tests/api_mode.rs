#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{locations, sitegen_cmd};

#[tokio::test(flavor = "multi_thread")]
async fn builds_sitemap_from_export_api() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/php/api/export_sitemap_data.php"))
        .and(query_param("include", "products,articles"))
        .and(query_param("limit", "10000"))
        .and(query_param("offset", "0"))
        .and(header("X-API-Key", "export-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                {"sku": "ABC-123"},
                {"url": "https://old-host.com/p/xyz?ref=1"},
                {"sku": "null"}
            ],
            "articles": [
                {"parent": "Havalı Aletler", "child": "Tork", "title": "Yeni%20Makale"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api_url = format!("{}/php/api/export_sitemap_data.php", server.uri());
    sitegen_cmd(dir.path())
        .args(["-b", "https://example.com", "--api-url", &api_url])
        .env("SITEGEN_API_KEY", "export-key")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Wrote sitemap.xml with 14 URLs (products: 3, categories: 2)",
        ));

    let xml = std::fs::read_to_string(dir.path().join("sitemap.xml"))?;
    let locs = locations(&xml);
    assert!(locs.contains(&"https://example.com/urun/abc-123".to_string()));
    assert!(locs.contains(&"https://example.com/p/xyz?ref=1".to_string()));
    assert!(locs.contains(&"https://example.com/kategoriler/havali-aletler/tork/".to_string()));
    assert!(!locs.iter().any(|l| l.contains("makale")));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn api_failure_still_succeeds_with_static_pages() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    sitegen_cmd(dir.path())
        .args(["-b", "https://example.com", "--api-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("with 10 URLs (products: 0, categories: 0)"))
        .stderr(predicate::str::contains("Export fetch failed"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn uploads_written_sitemap() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/php/api/generate_sitemap.php"))
        .and(header("X-API-Key", "upload-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "sitemap written",
            "path": "/srv/www/sitemap.xml"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload_url = format!("{}/php/api/generate_sitemap.php", server.uri());
    let output = sitegen_cmd(dir.path())
        .args(["-b", "https://example.com", "--upload-url", &upload_url, "--format", "json"])
        .env("SITEGEN_UPLOAD_KEY", "upload-key")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(report["upload"]["status"], "uploaded");
    assert_eq!(report["upload"]["path"], "/srv/www/sitemap.xml");
    assert!(dir.path().join("sitemap.xml").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_upload_keeps_exit_code_zero() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    sitegen_cmd(dir.path())
        .args(["-b", "https://example.com", "--upload-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid API key"));
    assert!(dir.path().join("sitemap.xml").exists());
    Ok(())
}
