//! Polling watcher for `data.chart` content on a single award endpoint.
//!
//! The endpoint returns `{"data": {"chart": []}}` until results are
//! published. The watcher polls until the list is populated, then returns
//! it.

use std::time::Duration;

use pitstop_core::WatchConfig;
use serde_json::Value;

use crate::client::AwardClient;
use crate::error::ScraperError;
use crate::retry::{is_transient, RetryBudget};

const RAW_SNIPPET_CHARS: usize = 200;
const VALUE_SNIPPET_CHARS: usize = 50;

/// Shape of the value found at `data.chart`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    /// `data` or `data.chart` is absent (or null).
    Missing,
    /// `data.chart` is an empty list.
    Empty,
    /// `data.chart` is present but not a list; holds the JSON type name.
    Unexpected(&'static str),
    Populated(Vec<Value>),
}

/// Classifies a response body by its `data.chart` value.
#[must_use]
pub fn classify_chart(body: &Value) -> ChartStatus {
    match body.get("data").and_then(|d| d.get("chart")) {
        None | Some(Value::Null) => ChartStatus::Missing,
        Some(Value::Array(items)) if items.is_empty() => ChartStatus::Empty,
        Some(Value::Array(items)) => ChartStatus::Populated(items.clone()),
        Some(other) => ChartStatus::Unexpected(json_kind(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn snippet(value: &Value, max: usize) -> String {
    value.to_string().chars().take(max).collect()
}

/// What the poll loop should do after one check.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchStep {
    /// Chart data appeared; the loop ends.
    Detected(Vec<Value>),
    /// Transient failure with budget left: check again after the retry delay.
    Retry { attempt: u32 },
    /// Wait the full check interval before the next check.
    Wait,
}

/// Polls one URL until `data.chart` is a non-empty list.
#[derive(Debug)]
pub struct ChartWatcher {
    client: AwardClient,
    url: String,
    check_interval: Duration,
    retry_delay: Duration,
    budget: RetryBudget,
}

impl ChartWatcher {
    #[must_use]
    pub fn new(client: AwardClient, config: &WatchConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            check_interval: config.check_interval,
            retry_delay: config.retry_delay,
            budget: RetryBudget::new(config.max_retries),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retries spent since the last successful fetch.
    #[must_use]
    pub fn retries_used(&self) -> u32 {
        self.budget.used()
    }

    /// Fetches once and classifies the body. A successful fetch refills the
    /// retry budget.
    ///
    /// # Errors
    ///
    /// Returns the client error unchanged; the budget is not touched.
    pub async fn check_once(&mut self) -> Result<ChartStatus, ScraperError> {
        let body = self.client.get_json(&self.url).await?;
        self.budget.reset();

        let status = classify_chart(&body);
        match &status {
            ChartStatus::Missing => {
                tracing::debug!(raw = %snippet(&body, RAW_SNIPPET_CHARS), "raw response snippet");
            }
            ChartStatus::Unexpected(_) => {
                if let Some(chart) = body.pointer("/data/chart") {
                    tracing::debug!(value = %snippet(chart, VALUE_SNIPPET_CHARS), "chart value");
                }
            }
            ChartStatus::Empty | ChartStatus::Populated(_) => {}
        }
        Ok(status)
    }

    /// Runs one check and decides the next move, logging as it goes.
    pub async fn step(&mut self) -> WatchStep {
        tracing::info!("checking for updates");
        match self.check_once().await {
            Ok(ChartStatus::Populated(items)) => {
                tracing::info!(">>> UPDATE DETECTED <<<");
                let pretty = serde_json::to_string_pretty(&items)
                    .unwrap_or_else(|_| Value::Array(items.clone()).to_string());
                tracing::info!("chart data:\n{pretty}");
                WatchStep::Detected(items)
            }
            Ok(ChartStatus::Missing) => {
                tracing::warn!("response format unexpected: 'data' or 'chart' key missing");
                WatchStep::Wait
            }
            Ok(ChartStatus::Empty) => {
                tracing::info!("no update yet, chart data is empty");
                tracing::debug!(length = 0, "current chart length");
                WatchStep::Wait
            }
            Ok(ChartStatus::Unexpected(kind)) => {
                tracing::info!("no update yet, chart data is not in the expected format");
                tracing::debug!(kind, "current chart type");
                WatchStep::Wait
            }
            Err(e) if is_transient(&e) => {
                tracing::error!(error = %e, "transient error while checking");
                if let Some(attempt) = self.budget.try_consume() {
                    tracing::info!(
                        attempt,
                        max_retries = self.budget.max(),
                        delay_secs = self.retry_delay.as_secs(),
                        "retrying"
                    );
                    WatchStep::Retry { attempt }
                } else {
                    tracing::warn!("max retries reached, waiting for the full interval");
                    WatchStep::Wait
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "check failed");
                WatchStep::Wait
            }
        }
    }

    /// Polls until chart data appears and returns it. Never returns
    /// otherwise; cancel the future to stop.
    pub async fn run(&mut self) -> Vec<Value> {
        tracing::info!(
            url = %self.url,
            interval_secs = self.check_interval.as_secs(),
            "monitoring for updates in 'data.chart'"
        );
        loop {
            match self.step().await {
                WatchStep::Detected(items) => {
                    tracing::info!("data found, stopping monitor");
                    return items;
                }
                WatchStep::Retry { .. } => tokio::time::sleep(self.retry_delay).await,
                WatchStep::Wait => {
                    tracing::info!(
                        secs = self.check_interval.as_secs(),
                        "waiting before next check"
                    );
                    tokio::time::sleep(self.check_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_chart_is_empty() {
        assert_eq!(
            classify_chart(&json!({"data": {"chart": []}})),
            ChartStatus::Empty
        );
    }

    #[test]
    fn populated_chart_is_detected() {
        assert_eq!(
            classify_chart(&json!({"data": {"chart": [{"x": 1}]}})),
            ChartStatus::Populated(vec![json!({"x": 1})])
        );
    }

    #[test]
    fn missing_data_or_chart_is_missing() {
        assert_eq!(classify_chart(&json!({})), ChartStatus::Missing);
        assert_eq!(classify_chart(&json!({"data": {}})), ChartStatus::Missing);
        assert_eq!(
            classify_chart(&json!({"data": {"chart": null}})),
            ChartStatus::Missing
        );
        assert_eq!(classify_chart(&json!({"data": 3})), ChartStatus::Missing);
        assert_eq!(classify_chart(&json!([1, 2])), ChartStatus::Missing);
    }

    #[test]
    fn non_list_chart_is_unexpected() {
        assert_eq!(
            classify_chart(&json!({"data": {"chart": {"events": []}}})),
            ChartStatus::Unexpected("object")
        );
        assert_eq!(
            classify_chart(&json!({"data": {"chart": "soon"}})),
            ChartStatus::Unexpected("string")
        );
    }

    #[test]
    fn snippet_truncates() {
        let s = snippet(&json!({"k": "x".repeat(500)}), RAW_SNIPPET_CHARS);
        assert_eq!(s.chars().count(), RAW_SNIPPET_CHARS);
        assert_eq!(snippet(&json!("short"), VALUE_SNIPPET_CHARS), "\"short\"");
    }
}
