use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, WatchConfig};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

pub const DEFAULT_WATCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 F1UpdateChecker/1.0";

pub const DEFAULT_WATCH_URL: &str = "https://inmotion.dhl/api/f1-award-element-data/6365?event=1094";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("PITSTOP_LOG_LEVEL", "info");
    let log_file = lookup("PITSTOP_LOG_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let seasons_path = PathBuf::from(or_default("PITSTOP_SEASONS_PATH", "./config/seasons.yaml"));
    let output_dir = PathBuf::from(or_default("PITSTOP_OUTPUT_DIR", "."));

    let request_timeout_secs = parse_u64("PITSTOP_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PITSTOP_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("PITSTOP_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("PITSTOP_INTER_REQUEST_DELAY_MS", "0")?;

    let watch = WatchConfig {
        url: or_default("PITSTOP_WATCH_URL", DEFAULT_WATCH_URL),
        user_agent: or_default("PITSTOP_WATCH_USER_AGENT", DEFAULT_WATCH_USER_AGENT),
        check_interval: Duration::from_secs(parse_u64("PITSTOP_WATCH_INTERVAL_SECS", "60")?),
        max_retries: parse_u32("PITSTOP_WATCH_MAX_RETRIES", "3")?,
        retry_delay: Duration::from_secs(parse_u64("PITSTOP_WATCH_RETRY_DELAY_SECS", "10")?),
    };

    Ok(AppConfig {
        log_level,
        log_file,
        seasons_path,
        output_dir,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        watch,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
