//! HTTP client for the award element data API.
//!
//! Every endpoint is a plain GET returning JSON. Non-2xx statuses are turned
//! into [`ScraperError::Http`] before the body is looked at, and bodies that
//! fail to parse surface as [`ScraperError::Decode`] with a snippet of the
//! text for diagnostics.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::EventId;

/// Characters of an unparseable body kept for error reports.
pub(crate) const BODY_SNIPPET_CHARS: usize = 500;

/// Client for the award element data API.
///
/// Holds a `reqwest::Client` configured with the request timeout and a fixed
/// `User-Agent`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AwardClient {
    client: Client,
}

impl AwardClient {
    /// Creates a client with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse.
    /// - [`ScraperError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`ScraperError::Decode`] if the body is not valid JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ScraperError> {
        let parsed = parse_url(url)?;
        self.request_json(parsed).await
    }

    /// Builds the per-event URL: `base_url` with `event=<id>` appended to the
    /// query string.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse.
    pub fn event_url(base_url: &str, event_id: &EventId) -> Result<Url, ScraperError> {
        let mut url = parse_url(base_url)?;
        url.query_pairs_mut()
            .append_pair("event", &event_id.to_string());
        Ok(url)
    }

    pub(crate) async fn request_json(&self, url: Url) -> Result<serde_json::Value, ScraperError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Decode {
            url: url.to_string(),
            body_snippet: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            source: e,
        })
    }
}

fn parse_url(url: &str) -> Result<Url, ScraperError> {
    Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
