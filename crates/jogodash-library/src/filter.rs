//! Filter engine: genre, minimum rating and result cap

use crate::catalog::GameRecord;
use serde::{Deserialize, Serialize};

/// Size of the ranked view
pub const TOP_LIMIT: usize = 10;

/// How many filtered games to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Every matching game
    #[default]
    All,
    /// The best rated games, up to [`TOP_LIMIT`]
    Top10,
}

impl DisplayMode {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::All => "Todos os jogos",
            DisplayMode::Top10 => "Top 10 por nota",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::All => DisplayMode::Top10,
            DisplayMode::Top10 => DisplayMode::All,
        }
    }
}

/// A derived view over the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub games: Vec<GameRecord>,
    pub mode: DisplayMode,
    /// Set in `Top10` mode when no more than [`TOP_LIMIT`] games matched,
    /// so the list was neither ranked nor cut
    pub short_of_limit: bool,
}

impl FilterOutcome {
    /// Outcome when no genre can be selected
    pub fn empty(mode: DisplayMode) -> Self {
        Self {
            games: Vec::new(),
            mode,
            short_of_limit: mode == DisplayMode::Top10,
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Keep games tagged with `genre` rated at least `min_rating`
///
/// `min_rating` is compared as given, without clamping. Games with no rating
/// never match. In `Top10` mode a result longer than [`TOP_LIMIT`] is sorted by
/// rating, best first (ties keep catalog order), and cut; a shorter one is
/// returned as-is with `short_of_limit` set.
pub fn filter_games(
    games: &[GameRecord],
    genre: &str,
    min_rating: f64,
    mode: DisplayMode,
) -> FilterOutcome {
    let mut matched: Vec<GameRecord> = games
        .iter()
        .filter(|game| game.has_genre(genre))
        .filter(|game| game.rating.is_some_and(|rating| rating >= min_rating))
        .cloned()
        .collect();

    let mut short_of_limit = false;
    if mode == DisplayMode::Top10 {
        if matched.len() > TOP_LIMIT {
            matched.sort_by(|a, b| rating_of(b).total_cmp(&rating_of(a)));
            matched.truncate(TOP_LIMIT);
        } else {
            short_of_limit = true;
        }
    }

    FilterOutcome {
        games: matched,
        mode,
        short_of_limit,
    }
}

fn rating_of(game: &GameRecord) -> f64 {
    game.rating.unwrap_or(f64::NEG_INFINITY)
}
