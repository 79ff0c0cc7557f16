//! Batch fetch-and-export for one season.
//!
//! Enumerate events, fetch each event's payload, extract the standings table
//! and write it to `<output_root>/<year>/<race name>.json`. Per-event
//! failures are logged and skipped; only setup failures abort the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pitstop_core::{resolve_race_name, AppConfig, SeasonCatalog};
use pitstop_export::{extract_table, write_records};
use pitstop_scraper::{fetch_events, AwardClient, EventDetailFetcher};

/// Counts for one `fetch` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub events: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub written: Vec<PathBuf>,
}

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<AwardClient> {
    AwardClient::new(config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build award API client: {e}"))
}

/// Runs the pipeline for `year`. Unknown years use the latest season's
/// endpoints and race table, but output still lands under the requested
/// year's directory.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    catalog: &SeasonCatalog,
    year: u16,
    output_root: &Path,
) -> anyhow::Result<RunSummary> {
    tracing::info!(year, "fetching F1 award data");
    let selection = catalog.select(year);
    let season = selection.season;
    let client = build_client(config)?;

    let events = fetch_events(&client, &season.event_list_url).await;
    if events.is_empty() {
        tracing::info!(year, "no events data found");
        return Ok(RunSummary::default());
    }

    let mut fetcher =
        EventDetailFetcher::new(client, Duration::from_millis(config.inter_request_delay_ms));
    let batch = fetcher.fetch_all(&events, &season.event_detail_url).await;

    let out_dir = output_root.join(year.to_string());
    let mut summary = RunSummary {
        events: events.len(),
        fetched: batch.summary.succeeded,
        ..RunSummary::default()
    };

    for event in &events {
        let title = event.display_title();
        let Some(detail) = event.usable_id().and_then(|id| batch.get(id)) else {
            tracing::warn!(title, "skipping event: no data available");
            summary.skipped += 1;
            continue;
        };
        let Some(payload) = detail.payload() else {
            let error = detail
                .error_message()
                .unwrap_or_else(|| "payload is not an object".to_owned());
            tracing::warn!(title, error = %error, "skipping event: error in data");
            summary.skipped += 1;
            continue;
        };

        tracing::info!(title, "processing event");
        let Some(table) = extract_table(payload) else {
            tracing::warn!(title, "skipping event: no table extracted");
            summary.skipped += 1;
            continue;
        };

        let race = resolve_race_name(catalog, title, year);
        match write_records(&table.to_records(), &out_dir, race.name()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), rows = table.len(), "saved event data");
                summary.written.push(path);
            }
            Err(e) => {
                tracing::error!(title, error = %e, "failed to write event data");
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        events = summary.events,
        fetched = summary.fetched,
        written = summary.written.len(),
        skipped = summary.skipped,
        "processing complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
