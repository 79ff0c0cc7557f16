//! Maps free-text event titles to canonical Grand Prix names.

use std::sync::LazyLock;

use regex::Regex;

use crate::seasons::SeasonCatalog;

/// Name used for output when a title cannot be resolved.
pub const UNKNOWN_RACE_NAME: &str = "Unknown Grand Prix";

static GRAND_PRIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Z]+(?:\s+[A-Z]+)*)\s+GRAND\s+PRIX").expect("valid grand prix regex")
});

/// Outcome of resolving an event title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceResolution {
    /// A token from the season's race table occurred in the title.
    Table { token: String, name: String },
    /// No token matched; the name was lifted from a `<words> Grand Prix` phrase.
    Extracted { name: String },
    Unresolved,
}

impl RaceResolution {
    /// Display name, falling back to [`UNKNOWN_RACE_NAME`].
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            RaceResolution::Table { name, .. } | RaceResolution::Extracted { name } => name,
            RaceResolution::Unresolved => UNKNOWN_RACE_NAME,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RaceResolution::Unresolved)
    }

    /// The resolved name, or `None` for callers that treat an unknown race
    /// as a failure.
    #[must_use]
    pub fn into_name(self) -> Option<String> {
        match self {
            RaceResolution::Table { name, .. } | RaceResolution::Extracted { name } => Some(name),
            RaceResolution::Unresolved => None,
        }
    }
}

/// Resolve `title` to a canonical race name using the race table for `year`.
///
/// 1. Use the race table for `year`, or the latest season's table when the
///    year is not in the catalog.
/// 2. Return the name of the first token, in table order, that occurs in the
///    uppercased title.
/// 3. Otherwise extract `<words> GRAND PRIX` (case-insensitive) and return
///    `"<words> Grand Prix"` with the words as written in the title.
/// 4. Otherwise [`RaceResolution::Unresolved`].
///
/// There is no tie-break beyond table order: a title containing two tokens
/// (e.g. a sponsor that shares a country name) resolves to whichever is
/// listed first.
#[must_use]
pub fn resolve_race_name(catalog: &SeasonCatalog, title: &str, year: u16) -> RaceResolution {
    let races = &catalog.season_or_latest(year).races;
    let upper = title.to_uppercase();

    if let Some(race) = races.iter().find(|r| upper.contains(r.token.as_str())) {
        return RaceResolution::Table {
            token: race.token.clone(),
            name: race.name.clone(),
        };
    }

    if let Some(caps) = GRAND_PRIX_RE.captures(title) {
        let location = caps[1].trim();
        return RaceResolution::Extracted {
            name: format!("{location} Grand Prix"),
        };
    }

    tracing::warn!(title, year, "could not determine race name");
    RaceResolution::Unresolved
}
