//! HTTP transport seam between the assortment client and the network.
//!
//! [`HttpTransport`] is the production implementation backed by a shared
//! `reqwest::Client`. The [`Transport`] trait exists so the engine can be
//! driven by scripted responses in tests without a live server.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::HarvestError;

/// Raw outcome of one HTTP exchange: status code and body text, plus the
/// final URL and the parsed `Retry-After` header when the server sent one.
///
/// Status classification (404 vs 429 vs other) deliberately does not happen
/// here; the assortment client owns that policy.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    /// Full request URL, kept for error messages.
    pub url: String,
    /// Value of the `Retry-After` header in seconds, if present and numeric.
    pub retry_after_secs: Option<u64>,
}

/// Minimal HTTP surface the harvest engine needs: a GET and a JSON POST.
///
/// Implementations report only network-level failures as errors; any
/// response that arrived, whatever its status, is returned as a
/// [`TransportResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `path` (relative to the implementation's base URL)
    /// with the given query parameters.
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TransportResponse, HarvestError>;

    /// Issue a POST for `path` with `body` serialized as JSON.
    async fn post_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<TransportResponse, HarvestError>;
}

/// Production transport: one `reqwest::Client` with connection pooling,
/// a request timeout, and a fixed User-Agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url` (scheme and host, no
    /// trailing slash required).
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Http`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        request_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, HarvestError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(HttpTransport {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn into_transport_response(
        response: reqwest::Response,
    ) -> Result<TransportResponse, HarvestError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let retry_after_secs = parse_retry_after(response.headers());
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            body,
            url,
            retry_after_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TransportResponse, HarvestError> {
        let url = self.url_for(path);
        tracing::trace!(%url, "GET");
        let response = self.http.get(&url).query(query).send().await?;
        Self::into_transport_response(response).await
    }

    async fn post_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<TransportResponse, HarvestError> {
        let url = self.url_for(path);
        tracing::trace!(%url, "POST");
        let response = self.http.post(&url).query(query).json(body).send().await?;
        Self::into_transport_response(response).await
    }
}

/// Parses a numeric `Retry-After` header. Date-form values are ignored.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
