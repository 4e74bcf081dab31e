//! HTTP client for the storefront export API and the sitemap upload endpoint.
//!
//! The export endpoint answers `GET <api-url>?include=products,articles&limit=<n>&offset=<n>`
//! with `{ "products": [...], "articles": [...] }`. A fetch gets exactly one
//! attempt; [`ExportClient::fetch_export_or_empty`] turns every failure into
//! empty lists so a generation run never aborts on the network.

use crate::records::{RawRecord, into_objects};
use crate::{Error, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Header carrying the API key for both endpoints.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default number of rows requested from the export endpoint.
pub const DEFAULT_EXPORT_LIMIT: u32 = 10_000;

/// Request timeout for export fetches and uploads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What to request from the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Endpoint URL; the query parameters are appended to it.
    pub url: String,
    /// Optional key sent as `X-API-Key`.
    pub api_key: Option<String>,
    /// Maximum rows per collection.
    pub limit: u32,
    /// Rows to skip.
    pub offset: u32,
}

impl ExportRequest {
    /// Request with the default limit and offset.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            limit: DEFAULT_EXPORT_LIMIT,
            offset: 0,
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }
}

/// Product and article rows returned by the export endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPayload {
    /// Product rows (`sku`, `url`, taxonomy fields).
    pub products: Vec<RawRecord>,
    /// Article rows; only their taxonomy fields are used.
    pub articles: Vec<RawRecord>,
}

impl ExportPayload {
    /// Build a payload from a decoded response body.
    ///
    /// A missing or non-array collection becomes an empty list with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the body is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut body) = value else {
            return Err(Error::Parse("export response is not a JSON object".to_string()));
        };

        let mut take = |key: &str| match body.remove(key) {
            Some(Value::Array(rows)) => into_objects(rows),
            Some(_) => {
                warn!(key, "Export response field is not an array, ignoring");
                Vec::new()
            },
            None => {
                warn!(key, "Export response is missing field");
                Vec::new()
            },
        };

        let products = take("products");
        let articles = take("articles");
        Ok(Self { products, articles })
    }
}

/// Reply from the sitemap upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the server stored the sitemap.
    #[serde(default)]
    pub success: bool,
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: String,
    /// Where the server wrote the file, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// HTTP client shared by export fetches and sitemap uploads.
pub struct ExportClient {
    client: Client,
}

impl ExportClient {
    /// Create a client with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sitegen/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetch products and articles in a single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failures and non-2xx statuses,
    /// and [`Error::Parse`] if the body is not a JSON object.
    #[instrument(skip_all, fields(url = %request.url, limit = request.limit, offset = request.offset))]
    pub async fn fetch_export(&self, request: &ExportRequest) -> Result<ExportPayload> {
        let limit = request.limit.to_string();
        let offset = request.offset.to_string();
        let mut builder = self.client.get(&request.url).query(&[
            ("include", "products,articles"),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ]);
        if let Some(key) = &request.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Received export response");

        let value: Value = serde_json::from_str(body.trim_start_matches('\u{feff}'))?;
        let payload = ExportPayload::from_value(value)?;
        info!(
            products = payload.products.len(),
            articles = payload.articles.len(),
            "Fetched export data"
        );
        Ok(payload)
    }

    /// Fetch products and articles, degrading any failure to empty lists.
    pub async fn fetch_export_or_empty(&self, request: &ExportRequest) -> ExportPayload {
        match self.fetch_export(request).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    url = %request.url,
                    error = %e,
                    category = e.category(),
                    "Export fetch failed, continuing without API data"
                );
                ExportPayload::default()
            },
        }
    }

    /// POST a rendered sitemap to the upload endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failures, and [`Error::Other`]
    /// when the server rejects the upload or replies `success: false`.
    #[instrument(skip_all, fields(url = %url, bytes = xml.len()))]
    pub async fn upload_sitemap(
        &self,
        url: &str,
        api_key: Option<&str>,
        xml: &str,
    ) -> Result<UploadResponse> {
        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(xml.to_string());
        if let Some(key) = api_key.filter(|key| !key.is_empty()) {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let reply: UploadResponse = serde_json::from_str(&body).unwrap_or_else(|_| UploadResponse {
            success: status.is_success(),
            message: body.trim().to_string(),
            path: None,
        });

        if !status.is_success() || !reply.success {
            return Err(Error::Other(format!(
                "sitemap upload rejected ({status}): {}",
                reply.message
            )));
        }

        info!(path = ?reply.path, "Uploaded sitemap");
        Ok(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::disallowed_macros)]
mod tests {
    use super::*;
    use crate::records::field_text;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ExportClient {
        ExportClient::with_timeout(Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_export_sends_query_and_key() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/export_sitemap_data.php"))
            .and(query_param("include", "products,articles"))
            .and(query_param("limit", "50"))
            .and(query_param("offset", "10"))
            .and(header(API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{"sku": "ABC-123"}, "junk"],
                "articles": [{"parent": "Pompa"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = ExportRequest::new(format!("{}/api/export_sitemap_data.php", server.uri()))
            .with_api_key(Some("secret".to_string()));
        request.limit = 50;
        request.offset = 10;

        let payload = client().fetch_export(&request).await?;
        assert_eq!(payload.products.len(), 1);
        assert_eq!(field_text(&payload.products[0], &["sku"]), Some("ABC-123".to_string()));
        assert_eq!(payload.articles.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_export_keeps_existing_query() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("site", "tr"))
            .and(query_param("include", "products,articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
            .expect(1)
            .mount(&server)
            .await;

        let request = ExportRequest::new(format!("{}/export?site=tr", server.uri()));
        let payload = client().fetch_export(&request).await?;
        assert!(payload.products.is_empty());
        assert!(payload.articles.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_success_status_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let request = ExportRequest::new(server.uri());
        assert!(client().fetch_export(&request).await.is_err());
        assert_eq!(client().fetch_export_or_empty(&request).await, ExportPayload::default());
    }

    #[tokio::test]
    async fn test_non_json_body_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let request = ExportRequest::new(server.uri());
        match client().fetch_export(&request).await {
            Err(Error::Parse(_)) => {},
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(client().fetch_export_or_empty(&request).await, ExportPayload::default());
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": [{"sku": "A"}]}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = ExportClient::with_timeout(Duration::from_millis(50)).unwrap();
        let payload = client.fetch_export_or_empty(&ExportRequest::new(server.uri())).await;
        assert!(payload.products.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_degrades_to_empty() {
        let payload = client()
            .fetch_export_or_empty(&ExportRequest::new("http://127.0.0.1:9/export"))
            .await;
        assert_eq!(payload, ExportPayload::default());
    }

    #[test]
    fn test_payload_tolerates_wrong_shapes() {
        let payload = ExportPayload::from_value(json!({"products": {"sku": "A"}, "articles": null}))
            .unwrap();
        assert!(payload.products.is_empty());
        assert!(payload.articles.is_empty());
        assert!(ExportPayload::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let request = ExportRequest::new("http://x").with_api_key(Some(String::new()));
        assert!(request.api_key.is_none());
    }

    #[tokio::test]
    async fn test_upload_posts_xml_with_key() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/php/api/generate_sitemap.php"))
            .and(header(API_KEY_HEADER, "upload-secret"))
            .and(header("content-type", "application/xml; charset=utf-8"))
            .and(body_string("<urlset/>"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "sitemap written",
                "path": "/var/www/sitemap.xml"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client()
            .upload_sitemap(
                &format!("{}/php/api/generate_sitemap.php", server.uri()),
                Some("upload-secret"),
                "<urlset/>",
            )
            .await?;
        assert!(reply.success);
        assert_eq!(reply.path.as_deref(), Some("/var/www/sitemap.xml"));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_rejected_key_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let err = client()
            .upload_sitemap(&server.uri(), Some("wrong"), "<urlset/>")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }
}
