//! # API Client
//!
//! Shared HTTP plumbing for the billing backend.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductsApi / BillsApi                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  request(method, "/api/...")                                            │
//! │       ├── base_url + path (slashes normalised)                          │
//! │       └── Authorization: Bearer <token>   (only if configured)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send ──► status 2xx? ──no──► ClientError::Status { status, body }      │
//! │                │                                                        │
//! │               yes                                                       │
//! │                ▼                                                        │
//! │  JSON decode ──fail──► ClientError::MalformedResponse                   │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  "success": false? ──► ClientError::Rejected                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is a single round trip: no retries, no backoff.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::bills::BillsApi;
use crate::error::{ClientError, ClientResult};
use crate::pdf::PdfFiles;
use crate::products::ProductsApi;

// =============================================================================
// Configuration
// =============================================================================

/// Server root used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Timeout for ordinary API calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// PDF rendering happens server side and is slow.
pub const DEFAULT_PDF_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://192.168.1.20:5000/`.
    pub base_url: String,

    /// Optional bearer token. Unset in the stock deployment.
    pub token: Option<String>,

    pub timeout: Duration,

    pub pdf_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pdf_timeout: Duration::from_secs(DEFAULT_PDF_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the billing backend.
///
/// Cheap to clone; the underlying connection pool is shared.
///
/// ## Example
/// ```rust,no_run
/// use nethra_api::{ApiClient, ClientConfig};
///
/// # async fn demo() -> nethra_api::ClientResult<()> {
/// let client = ApiClient::new(ClientConfig::new("http://localhost:5000"))?;
/// let products = client.products().list().await?;
/// println!("{} products", products.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
    pdf_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base = parse_base_url(&config.base_url)?;
        let http = Client::builder().timeout(config.timeout).build()?;

        debug!(base_url = %base, timeout_secs = config.timeout.as_secs(), "API client ready");

        Ok(ApiClient {
            http,
            base,
            token: config.token.filter(|t| !t.trim().is_empty()),
            pdf_timeout: config.pdf_timeout,
        })
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Catalog endpoints.
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Bill endpoints.
    pub fn bills(&self) -> BillsApi<'_> {
        BillsApi::new(self)
    }

    /// PDF download and hand-off.
    pub fn pdfs(&self) -> PdfFiles<'_> {
        PdfFiles::new(self)
    }

    // -------------------------------------------------------------------------
    // Crate-internal plumbing
    // -------------------------------------------------------------------------

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn pdf_timeout(&self) -> Duration {
        self.pdf_timeout
    }

    /// Starts a request to a backend path with auth applied.
    pub(crate) fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = join_url(&self.base, path)?;
        debug!(method = %method, url = %url, "API request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Sends a request and decodes a JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let body = success_body(response).await?;
        decode(&body)
    }

    /// Sends a request whose body only needs to acknowledge success.
    ///
    /// An empty body counts as success. A JSON body with `"success": false`
    /// becomes [`ClientError::Rejected`].
    pub(crate) async fn acknowledge(&self, request: RequestBuilder, action: &str) -> ClientResult<()> {
        let response = request.send().await?;
        let body = success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<Ack>(&body) {
            Ok(ack) => ack.into_result(action),
            // Not an object with a success flag; a 2xx is enough.
            Err(_) => Ok(()),
        }
    }
}

/// Returns the body of a 2xx response, or a `Status` error with whatever
/// text the server sent.
pub(crate) async fn success_body(response: Response) -> ClientResult<String> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), url = %url, "API error response");
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.text().await?)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

// =============================================================================
// URL Handling
// =============================================================================

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!(
            "unsupported scheme `{}` in {}",
            other, raw
        ))),
    }
}

/// Joins a path onto a base URL with exactly one slash between them.
///
/// Unlike `Url::join`, a base path like `/billing` is kept rather than
/// replaced.
pub(crate) fn join_url(base: &Url, path: &str) -> ClientResult<Url> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{ "data": [...] }`, or a bare array from older servers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

/// `{ "data": {...} }`, or the record itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            ItemEnvelope::Wrapped { data } => data,
            ItemEnvelope::Bare(item) => item,
        }
    }
}

/// `{ "success": bool, "message"?: str }`
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl Ack {
    pub(crate) fn into_result(self, action: &str) -> ClientResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ClientError::Rejected(
                self.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("{} was not accepted", action)),
            ))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_normalises_slashes() {
        let base = Url::parse("http://10.0.2.2:5000/").unwrap();
        assert_eq!(
            join_url(&base, "/api/get_items").unwrap().as_str(),
            "http://10.0.2.2:5000/api/get_items"
        );
        assert_eq!(
            join_url(&base, "api/get_items").unwrap().as_str(),
            "http://10.0.2.2:5000/api/get_items"
        );

        let base = Url::parse("https://example.in/billing").unwrap();
        assert_eq!(
            join_url(&base, "/api/bills/all").unwrap().as_str(),
            "https://example.in/billing/api/bills/all"
        );
    }

    #[test]
    fn test_base_url_must_be_http() {
        assert!(parse_base_url("http://localhost:5000").is_ok());
        assert!(parse_base_url("https://example.in").is_ok());
        assert!(matches!(
            parse_base_url("ftp://example.in"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let config = ClientConfig::default().with_token(Some("  ".into()));
        assert!(config.token.is_none());

        let config = ClientConfig::default().with_token(Some("abc".into()));
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_envelopes() {
        let wrapped: ListEnvelope<u32> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![1, 2]);

        let bare: ListEnvelope<u32> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_vec(), vec![3]);
    }

    #[test]
    fn test_ack() {
        let ack: Ack = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert!(ack.into_result("Update").is_ok());

        let ack: Ack = serde_json::from_str(r#"{"success":false}"#).unwrap();
        let err = ack.into_result("Update bill").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Server rejected the request: Update bill was not accepted"
        );
    }
}
