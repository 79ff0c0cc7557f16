//! HTTP side of pitstop: the award API client, the season event enumerator,
//! the cached per-event detail fetcher, and the chart update watcher.

pub mod client;
pub mod detail;
pub mod error;
pub mod events;
pub mod types;
pub mod watch;

mod retry;

pub use client::AwardClient;
pub use detail::{DetailBatch, EventCache, EventDetailFetcher};
pub use error::ScraperError;
pub use events::{extract_events, fetch_events};
pub use types::{EventDetail, EventId, EventSummary, FetchFailure, FetchSummary};
pub use watch::{classify_chart, ChartStatus, ChartWatcher, WatchStep};
