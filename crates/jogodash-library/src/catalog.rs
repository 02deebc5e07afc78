//! Loaded game catalog

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A game from the catalog table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub title: String,
    /// `None` when the stored value is NULL or not numeric
    pub rating: Option<f64>,
    /// Display-locale genre tokens
    pub genres: Vec<String>,
    pub team: Vec<String>,
    /// Remaining columns, untouched
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl GameRecord {
    pub fn new(title: impl Into<String>, rating: f64, genres: &[&str]) -> Self {
        Self {
            title: title.into(),
            rating: Some(rating),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            team: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// Counters for rows that loaded in degraded form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows: usize,
    /// Rows whose `genres` cell could not be decoded
    pub malformed_genres: usize,
    /// Rows whose `team` cell could not be decoded
    pub malformed_team: usize,
    /// Rows without a numeric rating
    pub missing_ratings: usize,
    /// Rows with at least one of the above
    pub degraded_rows: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.degraded_rows == 0
    }
}

/// Immutable result of one catalog load
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    games: Vec<GameRecord>,
    report: LoadReport,
}

impl Catalog {
    pub fn new(games: Vec<GameRecord>, report: LoadReport) -> Self {
        Self { games, report }
    }

    /// Build a catalog from records that are already decoded
    pub fn from_records(games: Vec<GameRecord>) -> Self {
        let report = LoadReport {
            rows: games.len(),
            ..LoadReport::default()
        };
        Self { games, report }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Distinct genres across the catalog, sorted ascending
    pub fn genres(&self) -> Vec<String> {
        self.games
            .iter()
            .flat_map(|game| game.genres.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
