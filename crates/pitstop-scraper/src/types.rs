//! Award API data shapes.
//!
//! Event list entries look like `{"id": 1086, "title": "FORMULA 1 ... 2025", ...}`;
//! the id is a number on most seasons but has been seen as a string, so it is
//! kept opaque. Per-event payloads are left as raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScraperError;

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Opaque event identifier as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
    /// Any other JSON number, such as `1086.0` or a value above `i64::MAX`.
    /// Kept as sent so it formats the same way in the detail URL.
    OtherNumber(serde_json::Number),
}

impl EventId {
    /// `true` for ids the API uses as placeholders: `0` and `""`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            EventId::Number(n) => *n == 0,
            EventId::Text(s) => s.is_empty(),
            EventId::OtherNumber(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
            EventId::OtherNumber(n) => write!(f, "{n}"),
        }
    }
}

/// One entry of a season's `data.chart.events` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(default)]
    pub id: Option<EventId>,
    #[serde(default)]
    pub title: Option<String>,
    /// Remaining fields, kept so the event can be echoed back verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl EventSummary {
    /// The id, unless missing or blank.
    #[must_use]
    pub fn usable_id(&self) -> Option<&EventId> {
        self.id.as_ref().filter(|id| !id.is_blank())
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }
}

/// Why an event's payload could not be fetched. Serializes to the
/// `{"error": ..., "response_text": ...}` record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
}

impl From<&ScraperError> for FetchFailure {
    fn from(err: &ScraperError) -> Self {
        match err {
            ScraperError::Decode { body_snippet, .. } => FetchFailure {
                error: err.to_string(),
                response_text: Some(body_snippet.clone()),
            },
            ScraperError::Http(_) | ScraperError::InvalidUrl { .. } => FetchFailure {
                error: err.to_string(),
                response_text: None,
            },
        }
    }
}

/// Result of fetching one event's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    Fetched(Value),
    Failed(FetchFailure),
}

impl EventDetail {
    /// The payload when it can be processed: fetched, a JSON object, and
    /// without an `"error"` key of its own.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            EventDetail::Fetched(value)
                if value.as_object().is_some_and(|o| !o.contains_key("error")) =>
            {
                Some(value)
            }
            EventDetail::Fetched(_) | EventDetail::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.payload().is_some()
    }

    /// Error text for unusable records, if one is available.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            EventDetail::Failed(failure) => Some(failure.error.clone()),
            EventDetail::Fetched(value) => value.get("error").map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }

    /// JSON record form: the payload itself, or the error object.
    #[must_use]
    pub fn to_record(&self) -> Value {
        match self {
            EventDetail::Fetched(value) => value.clone(),
            EventDetail::Failed(failure) => {
                serde_json::to_value(failure).unwrap_or_else(|_| Value::Null)
            }
        }
    }
}

/// Success/failure counts for one batch of detail fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    /// Number of events handed to the fetcher, including skipped ones.
    pub total: usize,
    pub succeeded: usize,
}

impl FetchSummary {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.succeeded)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn event_id_accepts_number_and_string() {
        let n: EventId = serde_json::from_value(json!(1086)).unwrap();
        let s: EventId = serde_json::from_value(json!("1086")).unwrap();
        assert_eq!(n, EventId::Number(1086));
        assert_eq!(s, EventId::Text("1086".to_string()));
        assert_eq!(n.to_string(), s.to_string());
        assert_ne!(n, s, "numeric and textual ids stay distinct cache keys");
    }

    #[test]
    fn event_id_keeps_float_and_oversized_numbers() {
        let float: EventId = serde_json::from_value(json!(1086.0)).unwrap();
        let big: EventId = serde_json::from_value(json!(u64::MAX)).unwrap();
        assert!(matches!(float, EventId::OtherNumber(_)));
        assert_eq!(float.to_string(), "1086.0");
        assert_eq!(big.to_string(), u64::MAX.to_string());
        assert!(!float.is_blank());

        let zero: EventId = serde_json::from_value(json!(0.0)).unwrap();
        assert!(zero.is_blank());
    }

    #[test]
    fn summary_without_id_or_title() {
        let e: EventSummary = serde_json::from_value(json!({"slug": "x"})).unwrap();
        assert!(e.usable_id().is_none());
        assert_eq!(e.display_title(), UNKNOWN_TITLE);
        assert_eq!(e.extra.get("slug"), Some(&json!("x")));
    }

    #[test]
    fn blank_ids_are_not_usable() {
        let zero: EventSummary = serde_json::from_value(json!({"id": 0, "title": "t"})).unwrap();
        let empty: EventSummary = serde_json::from_value(json!({"id": "", "title": "t"})).unwrap();
        let null: EventSummary = serde_json::from_value(json!({"id": null, "title": "t"})).unwrap();
        assert!(zero.usable_id().is_none());
        assert!(empty.usable_id().is_none());
        assert!(null.usable_id().is_none());
    }

    #[test]
    fn summary_serializes_back_with_extra_fields() {
        let raw = json!({"id": 5, "title": "GP", "date": "2025-05-25"});
        let e: EventSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&e).unwrap(), raw);
    }

    #[test]
    fn failed_record_has_error_key() {
        let detail = EventDetail::Failed(FetchFailure {
            error: "HTTP error: timed out".to_string(),
            response_text: None,
        });
        assert!(!detail.is_usable());
        assert_eq!(detail.to_record(), json!({"error": "HTTP error: timed out"}));
        assert_eq!(detail.error_message().as_deref(), Some("HTTP error: timed out"));
    }

    #[test]
    fn fetched_payload_with_error_key_is_not_usable() {
        let detail = EventDetail::Fetched(json!({"error": "not found"}));
        assert!(!detail.is_usable());
        assert_eq!(detail.error_message().as_deref(), Some("not found"));
    }

    #[test]
    fn fetched_non_object_is_not_usable() {
        assert!(!EventDetail::Fetched(json!([1, 2])).is_usable());
    }

    #[test]
    fn fetched_object_is_usable() {
        let detail = EventDetail::Fetched(json!({"htmlList": {"table": "<table></table>"}}));
        assert!(detail.is_usable());
        assert!(detail.error_message().is_none());
    }

    #[test]
    fn decode_failure_keeps_response_text() {
        let source = serde_json::from_str::<Value>("<html>").unwrap_err();
        let err = ScraperError::Decode {
            url: "https://example.com".to_string(),
            body_snippet: "<html>".to_string(),
            source,
        };
        let failure = FetchFailure::from(&err);
        assert_eq!(failure.response_text.as_deref(), Some("<html>"));
        assert!(failure.error.contains("JSON decode error"));
    }

    #[test]
    fn fetch_summary_failed_count() {
        let s = FetchSummary {
            total: 5,
            succeeded: 3,
        };
        assert_eq!(s.failed(), 2);
    }
}
