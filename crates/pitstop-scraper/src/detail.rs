//! Per-event detail fetching with an in-memory cache.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::client::AwardClient;
use crate::types::{EventDetail, EventId, EventSummary, FetchFailure, FetchSummary};

/// Successful payloads keyed by event id, kept for the fetcher's lifetime.
#[derive(Debug, Default, Clone)]
pub struct EventCache {
    entries: HashMap<EventId, Value>,
}

impl EventCache {
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&Value> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: EventId, payload: Value) {
        self.entries.insert(id, payload);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Records produced by one [`EventDetailFetcher::fetch_all`] call.
#[derive(Debug, Clone)]
pub struct DetailBatch {
    pub records: HashMap<EventId, EventDetail>,
    pub summary: FetchSummary,
}

impl DetailBatch {
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&EventDetail> {
        self.records.get(id)
    }
}

/// Fetches `{base_url}?event={id}` for each event, sequentially.
///
/// Failures are recorded in the batch rather than returned. Only successful
/// payloads enter the cache, so a failed id is fetched again on the next
/// call.
#[derive(Debug)]
pub struct EventDetailFetcher {
    client: AwardClient,
    cache: EventCache,
    inter_request_delay: Duration,
}

impl EventDetailFetcher {
    #[must_use]
    pub fn new(client: AwardClient, inter_request_delay: Duration) -> Self {
        Self {
            client,
            cache: EventCache::default(),
            inter_request_delay,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    pub async fn fetch_all(&mut self, events: &[EventSummary], base_url: &str) -> DetailBatch {
        tracing::info!(count = events.len(), "fetching event details");
        let mut records = HashMap::new();

        for event in events {
            let title = event.display_title();
            let Some(id) = event.usable_id() else {
                tracing::warn!(title, "skipping event with missing id");
                continue;
            };

            if let Some(cached) = self.cache.get(id) {
                tracing::info!(event_id = %id, title, "using cached event data");
                records.insert(id.clone(), EventDetail::Fetched(cached.clone()));
                continue;
            }

            let detail = self.fetch_one(id, title, base_url).await;
            records.insert(id.clone(), detail);

            if !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }
        }

        let succeeded = records.values().filter(|d| d.is_usable()).count();
        let summary = FetchSummary {
            total: events.len(),
            succeeded,
        };
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed(),
            "event detail fetch complete"
        );

        DetailBatch { records, summary }
    }

    async fn fetch_one(&mut self, id: &EventId, title: &str, base_url: &str) -> EventDetail {
        let url = match AwardClient::event_url(base_url, id) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(event_id = %id, error = %e, "cannot build event URL");
                return EventDetail::Failed(FetchFailure::from(&e));
            }
        };

        tracing::info!(event_id = %id, title, url = %url, "fetching event data");
        match self.client.request_json(url).await {
            Ok(payload) => {
                self.cache.insert(id.clone(), payload.clone());
                tracing::info!(event_id = %id, "fetched event data");
                EventDetail::Fetched(payload)
            }
            Err(e) => {
                tracing::error!(event_id = %id, error = %e, "failed to fetch event data");
                EventDetail::Failed(FetchFailure::from(&e))
            }
        }
    }
}
