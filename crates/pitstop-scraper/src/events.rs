//! Season event enumeration.

use serde_json::Value;

use crate::client::AwardClient;
use crate::types::EventSummary;

/// Fetches `url` and returns the events listed under `data.chart.events`.
///
/// Never fails: fetch errors, decode errors, a missing path, or an empty list
/// all yield an empty vector with the cause logged. Entries that are not
/// event objects are skipped.
pub async fn fetch_events(client: &AwardClient, url: &str) -> Vec<EventSummary> {
    tracing::info!(url, "fetching season event list");

    let body = match client.get_json(url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(url, error = %e, "failed to fetch event list");
            return Vec::new();
        }
    };

    let events = extract_events(&body);
    if events.is_empty() {
        tracing::error!(url, "no events found at data.chart.events");
    } else {
        tracing::info!(url, count = events.len(), "extracted event list");
    }
    events
}

/// Pulls event summaries out of an event-list response body.
#[must_use]
pub fn extract_events(body: &Value) -> Vec<EventSummary> {
    let Some(raw) = body
        .pointer("/data/chart/events")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if !entry.is_object() {
                tracing::warn!(index, "skipping event list entry that is not an object");
                return None;
            }
            match serde_json::from_value::<EventSummary>(entry.clone()) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed event list entry");
                    None
                }
            }
        })
        .collect()
}
