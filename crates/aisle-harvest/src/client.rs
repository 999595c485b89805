//! Client for the consumer assortment API of a single venue.
//!
//! Wraps a [`Transport`] with URL construction, HTTP status classification,
//! JSON parsing, and a backoff schedule for transient failures. One client
//! addresses one venue in one language.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::HarvestError;
use crate::transport::{Transport, TransportResponse};
use crate::types::{AssortmentResponse, ItemsEnvelope};

/// `Retry-After` fallback when a 429 response does not carry the header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Wait schedule for re-attempting a failed request.
///
/// Only a 429 and network-level failures earn further attempts; any other
/// status is the server's answer, and a body that does not parse will not
/// parse next time. The wait doubles with each failure, starting at
/// `base_secs`, up to `budget` re-attempts.
#[derive(Debug, Clone, Copy)]
struct Backoff {
    budget: u32,
    base_secs: u64,
}

impl Backoff {
    /// The wait before the next attempt once `failed_attempts` have failed,
    /// or `None` when `err` is permanent or the budget is spent.
    fn delay_after(self, failed_attempts: u32, err: &HarvestError) -> Option<Duration> {
        let transient = matches!(
            err,
            HarvestError::RateLimited { .. } | HarvestError::Http(_)
        );
        if !transient || failed_attempts >= self.budget {
            return None;
        }
        // The shift saturates so an absurd budget cannot overflow.
        let factor = 1u64 << failed_attempts.min(62);
        Some(Duration::from_secs(self.base_secs.saturating_mul(factor)))
    }
}

/// Assortment API client for one venue.
///
/// Generic over its [`Transport`] so tests can script responses; production
/// code uses [`crate::transport::HttpTransport`].
#[derive(Debug)]
pub struct AssortmentClient<T> {
    transport: T,
    venue_slug: String,
    language: String,
    page_cap: usize,
    backoff: Backoff,
}

impl<T: Transport> AssortmentClient<T> {
    /// Creates a client for `venue_slug`, requesting payloads in `language`.
    ///
    /// `page_cap` is the item limit sent with search requests. `max_retries`
    /// and `backoff_base_secs` shape the wait schedule for rate limits and
    /// network failures; with `max_retries = 0` every request gets exactly
    /// one attempt.
    pub fn new(
        transport: T,
        venue_slug: impl Into<String>,
        language: impl Into<String>,
        page_cap: usize,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Self {
        AssortmentClient {
            transport,
            venue_slug: venue_slug.into(),
            language: language.into(),
            page_cap,
            backoff: Backoff {
                budget: max_retries,
                base_secs: backoff_base_secs,
            },
        }
    }

    /// Fetches the venue's full category tree.
    ///
    /// # Errors
    ///
    /// - [`HarvestError::NotFound`] if the venue slug does not resolve.
    /// - [`HarvestError::RateLimited`] on 429 after retries are exhausted.
    /// - [`HarvestError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`HarvestError::Deserialize`] if the body is not the expected shape.
    /// - [`HarvestError::Http`] for network-level failures after retries.
    pub async fn fetch_assortment(&self) -> Result<AssortmentResponse, HarvestError> {
        self.request_json(&self.assortment_path(), None, "venue assortment")
            .await
    }

    /// Fetches the item listing of one category by slug.
    ///
    /// A 404 here is an expected condition, not a defect: structural
    /// categories have no addressable listing of their own. Callers decide
    /// whether to treat [`HarvestError::NotFound`] as failure.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::fetch_assortment`].
    pub async fn fetch_category_items(
        &self,
        category_slug: &str,
    ) -> Result<ItemsEnvelope, HarvestError> {
        self.request_json(&self.category_items_path(category_slug), None, "category items")
            .await
    }

    /// Runs one item-search query against the venue's assortment.
    ///
    /// The request carries the client's `page_cap` as its item limit, so a
    /// result of exactly `page_cap` items means the query was truncated.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::fetch_assortment`].
    pub async fn search_items(&self, query: &str) -> Result<ItemsEnvelope, HarvestError> {
        let body = serde_json::json!({ "q": query, "limit": self.page_cap });
        self.request_json(&self.search_path(), Some(&body), "item search")
            .await
    }

    /// Sends one logical request, re-attempting on the backoff schedule.
    ///
    /// `body` selects the verb: `None` issues a GET, `Some` a JSON POST.
    /// Each attempt runs through the transport, status classification, and
    /// only then the JSON parse; a parse failure is final.
    async fn request_json<D: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        context: &str,
    ) -> Result<D, HarvestError> {
        let query = [("language", self.language.as_str())];
        let mut failed_attempts = 0u32;
        loop {
            let exchange = match body {
                None => self.transport.get(path, &query).await,
                Some(json) => self.transport.post_json(path, &query, json).await,
            };
            let err = match exchange.and_then(classify) {
                Ok(text) => {
                    return serde_json::from_str(&text).map_err(|e| HarvestError::Deserialize {
                        context: context.to_owned(),
                        source: e,
                    });
                }
                Err(err) => err,
            };
            let Some(wait) = self.backoff.delay_after(failed_attempts, &err) else {
                return Err(err);
            };
            failed_attempts += 1;
            tracing::warn!(
                context,
                failed_attempts,
                wait_secs = wait.as_secs(),
                error = %err,
                "transient failure, waiting before the next attempt"
            );
            tokio::time::sleep(wait).await;
        }
    }

    fn assortment_path(&self) -> String {
        format!(
            "/consumer-api/consumer-assortment/v1/venues/slug/{}/assortment",
            self.venue_slug
        )
    }

    fn category_items_path(&self, category_slug: &str) -> String {
        format!("{}/categories/slug/{category_slug}", self.assortment_path())
    }

    fn search_path(&self) -> String {
        format!("{}/items/search", self.assortment_path())
    }
}

/// Maps an HTTP status onto the error taxonomy, passing 2xx bodies through.
fn classify(response: TransportResponse) -> Result<String, HarvestError> {
    match response.status {
        429 => Err(HarvestError::RateLimited {
            domain: host_of(&response.url),
            retry_after_secs: response
                .retry_after_secs
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }),
        404 => Err(HarvestError::NotFound { url: response.url }),
        status if !(200..300).contains(&status) => Err(HarvestError::UnexpectedStatus {
            status,
            url: response.url,
        }),
        _ => Ok(response.body),
    }
}

/// Extracts the host portion of a URL for rate-limit error messages.
fn host_of(url: &str) -> String {
    let after_scheme = url.split_once("//").map_or(url, |(_, rest)| rest);
    after_scheme
        .split('/')
        .next()
        .unwrap_or(after_scheme)
        .to_owned()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
