//! Shared configuration and domain logic for pitstop.
//!
//! Holds the environment-driven [`AppConfig`], the season catalog loaded from
//! `config/seasons.yaml`, and the race-name resolver that turns marketing
//! event titles into canonical Grand Prix names.

pub mod app_config;
pub mod config;
pub mod error;
pub mod race_name;
pub mod seasons;

pub use app_config::{AppConfig, WatchConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use race_name::{resolve_race_name, RaceResolution, UNKNOWN_RACE_NAME};
pub use seasons::{load_seasons, RaceToken, Season, SeasonCatalog, SeasonSelection};
