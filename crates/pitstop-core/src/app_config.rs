use std::path::PathBuf;
use std::time::Duration;

/// Settings for the chart update watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub url: String,
    pub user_agent: String,
    /// Wait between regular checks.
    pub check_interval: Duration,
    /// Immediate retries allowed after transient network failures before
    /// falling back to `check_interval`.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub seasons_path: PathBuf,
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub watch: WatchConfig,
}
