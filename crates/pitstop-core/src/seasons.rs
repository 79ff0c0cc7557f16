//! Season catalog: per-year API endpoints and race-name tokens.
//!
//! The catalog lives in `config/seasons.yaml` so the hand-maintained tables
//! can be updated without touching code. A copy of that file is compiled in
//! and available through [`SeasonCatalog::bundled`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUNDLED_SEASONS: &str = include_str!("../../../config/seasons.yaml");

/// One entry of a season's race table: an uppercase substring of the event
/// title and the canonical name it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceToken {
    pub token: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub year: u16,
    /// Endpoint returning the season's event list under `data.chart.events`.
    pub event_list_url: String,
    /// Base endpoint for per-event payloads; queried with `?event=<id>`.
    pub event_detail_url: String,
    /// Race-name tokens in match order.
    #[serde(default)]
    pub races: Vec<RaceToken>,
}

/// The season picked for a requested year.
#[derive(Debug, Clone, Copy)]
pub struct SeasonSelection<'a> {
    pub requested: u16,
    pub season: &'a Season,
}

impl SeasonSelection<'_> {
    /// `true` when the requested year is not in the catalog and the latest
    /// season was substituted.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.requested != self.season.year
    }
}

#[derive(Debug, Deserialize)]
struct SeasonsFile {
    seasons: Vec<Season>,
}

/// Validated, immutable set of seasons. Always holds at least one season.
#[derive(Debug, Clone)]
pub struct SeasonCatalog {
    seasons: Vec<Season>,
    latest: usize,
}

impl SeasonCatalog {
    /// Parses and validates a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SeasonsFileParse`] on malformed YAML and
    /// [`ConfigError::Validation`] if the catalog breaks an invariant.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: SeasonsFile = serde_yaml::from_str(content)?;
        Self::from_seasons(file.seasons)
    }

    /// Builds a catalog from already-parsed seasons.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the list is empty, a year is
    /// duplicated or not four digits, a URL is not HTTP(S), or a race token
    /// is empty, lowercase, or repeated within its season.
    pub fn from_seasons(seasons: Vec<Season>) -> Result<Self, ConfigError> {
        validate_seasons(&seasons)?;
        let latest = seasons
            .iter()
            .enumerate()
            .max_by_key(|(_, s)| s.year)
            .map(|(i, _)| i)
            .ok_or_else(|| ConfigError::Validation("no seasons configured".to_string()))?;
        Ok(Self { seasons, latest })
    }

    /// The catalog compiled into the binary from `config/seasons.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only if the bundled file was edited into an
    /// invalid state.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUNDLED_SEASONS)
    }

    #[must_use]
    pub fn get(&self, year: u16) -> Option<&Season> {
        self.seasons.iter().find(|s| s.year == year)
    }

    /// The season with the highest year.
    #[must_use]
    pub fn latest(&self) -> &Season {
        &self.seasons[self.latest]
    }

    /// The season for `year`, or the latest season when `year` is unknown.
    #[must_use]
    pub fn season_or_latest(&self, year: u16) -> &Season {
        self.get(year).unwrap_or_else(|| self.latest())
    }

    /// Like [`Self::season_or_latest`], but logs a warning when falling back
    /// and reports what was requested.
    #[must_use]
    pub fn select(&self, year: u16) -> SeasonSelection<'_> {
        let selection = SeasonSelection {
            requested: year,
            season: self.season_or_latest(year),
        };
        if selection.fell_back() {
            tracing::warn!(
                requested = year,
                using = selection.season.year,
                "data for requested year not available; using latest season instead"
            );
        }
        selection
    }

    /// Configured years in ascending order.
    #[must_use]
    pub fn years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self.seasons.iter().map(|s| s.year).collect();
        years.sort_unstable();
        years
    }
}

/// Load and validate the season catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seasons(path: &Path) -> Result<SeasonCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeasonsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    SeasonCatalog::from_yaml_str(&content)
}

fn validate_seasons(seasons: &[Season]) -> Result<(), ConfigError> {
    if seasons.is_empty() {
        return Err(ConfigError::Validation(
            "at least one season must be configured".to_string(),
        ));
    }

    let mut seen_years = HashSet::new();

    for season in seasons {
        if !(1000..=9999).contains(&season.year) {
            return Err(ConfigError::Validation(format!(
                "season year {} is not a four-digit year",
                season.year
            )));
        }

        if !seen_years.insert(season.year) {
            return Err(ConfigError::Validation(format!(
                "duplicate season year: {}",
                season.year
            )));
        }

        for (field, url) in [
            ("event_list_url", &season.event_list_url),
            ("event_detail_url", &season.event_detail_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "season {} has invalid {field} '{url}'; must be an http(s) URL",
                    season.year
                )));
            }
        }

        let mut seen_tokens = HashSet::new();
        for race in &season.races {
            if race.token.trim().is_empty() || race.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "season {} has a race entry with an empty token or name",
                    season.year
                )));
            }
            if race.token != race.token.to_uppercase() {
                return Err(ConfigError::Validation(format!(
                    "season {} token '{}' must be uppercase",
                    season.year, race.token
                )));
            }
            if !seen_tokens.insert(race.token.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "season {} has duplicate token '{}'",
                    season.year, race.token
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(year: u16) -> Season {
        Season {
            year,
            event_list_url: format!("https://example.com/list/{year}"),
            event_detail_url: format!("https://example.com/detail/{year}"),
            races: vec![RaceToken {
                token: "MONACO".to_string(),
                name: "Monaco Grand Prix".to_string(),
            }],
        }
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let catalog = SeasonCatalog::bundled().expect("bundled seasons.yaml should be valid");
        assert_eq!(
            catalog.years(),
            vec![2018, 2019, 2020, 2021, 2022, 2023, 2024, 2025]
        );
        assert_eq!(catalog.latest().year, 2025);
    }

    #[test]
    fn bundled_catalog_keeps_endpoint_pairs() {
        let catalog = SeasonCatalog::bundled().unwrap();
        let s2025 = catalog.get(2025).unwrap();
        assert_eq!(
            s2025.event_list_url,
            "https://inmotion.dhl/api/f1-award-element-data/6367"
        );
        assert_eq!(
            s2025.event_detail_url,
            "https://inmotion.dhl/api/f1-award-element-data/6365"
        );
        let s2018 = catalog.get(2018).unwrap();
        assert_eq!(
            s2018.event_list_url,
            "https://inmotion.dhl/api/f1-award-element-data/6664"
        );
    }

    #[test]
    fn bundled_catalog_preserves_token_order() {
        let catalog = SeasonCatalog::bundled().unwrap();
        let tokens: Vec<&str> = catalog.get(2025).unwrap().races[..3]
            .iter()
            .map(|r| r.token.as_str())
            .collect();
        assert_eq!(tokens, ["AUSTRALIAN", "CHINESE", "JAPANESE"]);
    }

    #[test]
    fn select_known_year_does_not_fall_back() {
        let catalog = SeasonCatalog::bundled().unwrap();
        for year in catalog.years() {
            let selection = catalog.select(year);
            assert!(!selection.fell_back());
            assert_eq!(selection.season, catalog.get(year).unwrap());
        }
    }

    #[test]
    fn select_unknown_year_falls_back_to_latest() {
        let catalog = SeasonCatalog::bundled().unwrap();
        let selection = catalog.select(2031);
        assert!(selection.fell_back());
        assert_eq!(selection.requested, 2031);
        assert_eq!(selection.season.year, 2025);
        assert_eq!(selection.season.event_list_url, catalog.latest().event_list_url);
        assert_eq!(
            selection.season.event_detail_url,
            catalog.latest().event_detail_url
        );
    }

    #[test]
    fn latest_is_highest_year_regardless_of_order() {
        let catalog = SeasonCatalog::from_seasons(vec![season(2019), season(2024), season(2021)])
            .unwrap();
        assert_eq!(catalog.latest().year, 2024);
    }

    #[test]
    fn validate_rejects_empty_catalog() {
        let err = SeasonCatalog::from_seasons(vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn validate_rejects_duplicate_year() {
        let err = SeasonCatalog::from_seasons(vec![season(2024), season(2024)]).unwrap_err();
        assert!(err.to_string().contains("duplicate season year: 2024"));
    }

    #[test]
    fn validate_rejects_non_four_digit_year() {
        let err = SeasonCatalog::from_seasons(vec![season(25)]).unwrap_err();
        assert!(err.to_string().contains("four-digit"));
    }

    #[test]
    fn validate_rejects_lowercase_token() {
        let mut s = season(2024);
        s.races[0].token = "Monaco".to_string();
        let err = SeasonCatalog::from_seasons(vec![s]).unwrap_err();
        assert!(err.to_string().contains("must be uppercase"));
    }

    #[test]
    fn validate_rejects_duplicate_token() {
        let mut s = season(2024);
        s.races.push(s.races[0].clone());
        let err = SeasonCatalog::from_seasons(vec![s]).unwrap_err();
        assert!(err.to_string().contains("duplicate token 'MONACO'"));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut s = season(2024);
        s.event_detail_url = "ftp://example.com".to_string();
        let err = SeasonCatalog::from_seasons(vec![s]).unwrap_err();
        assert!(err.to_string().contains("event_detail_url"));
    }

    #[test]
    fn season_without_races_is_allowed() {
        let yaml = r#"
seasons:
  - year: 2026
    event_list_url: "https://example.com/list"
    event_detail_url: "https://example.com/detail"
"#;
        let catalog = SeasonCatalog::from_yaml_str(yaml).unwrap();
        assert!(catalog.get(2026).unwrap().races.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = SeasonCatalog::from_yaml_str("seasons: [year: oops").unwrap_err();
        assert!(matches!(err, ConfigError::SeasonsFileParse(_)));
    }

    #[test]
    fn load_seasons_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seasons.yaml");
        std::fs::write(
            &path,
            r#"
seasons:
  - year: 2030
    event_list_url: "https://example.com/list"
    event_detail_url: "https://example.com/detail"
    races:
      - { token: "MARS", name: "Mars Grand Prix" }
"#,
        )
        .unwrap();
        let catalog = load_seasons(&path).unwrap();
        assert_eq!(catalog.latest().races[0].name, "Mars Grand Prix");
    }

    #[test]
    fn load_seasons_missing_file_is_io_error() {
        let err = load_seasons(Path::new("/definitely/not/here/seasons.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::SeasonsFileIo { .. }));
    }
}
