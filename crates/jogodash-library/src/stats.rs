//! Summary metrics and genre distribution for a filtered view

use crate::catalog::GameRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Number of slices kept in the genre distribution
pub const DISTRIBUTION_LIMIT: usize = 10;

/// Mean rating, or an explicit marker when there is nothing to average
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AverageRating {
    Value(f64),
    NotAvailable,
}

impl AverageRating {
    pub fn value(&self) -> Option<f64> {
        match self {
            AverageRating::Value(v) => Some(*v),
            AverageRating::NotAvailable => None,
        }
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AverageRating::Value(v) => {
                // Two decimals at most, trailing zeros dropped: 4.5, 1.33, 4.0
                let rounded = (v * 100.0).round() / 100.0;
                if rounded.fract() == 0.0 {
                    write!(f, "{:.1}", rounded)
                } else {
                    write!(f, "{}", rounded)
                }
            }
            AverageRating::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Mean of the ratings present in `games`
pub fn average_rating(games: &[GameRecord]) -> AverageRating {
    let (sum, count) = games
        .iter()
        .filter_map(|game| game.rating)
        .filter(|rating| rating.is_finite())
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));

    if count == 0 {
        AverageRating::NotAvailable
    } else {
        AverageRating::Value(sum / count as f64)
    }
}

/// Count and average for the metrics row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub average: AverageRating,
}

impl Summary {
    pub fn of(games: &[GameRecord]) -> Self {
        Self {
            count: games.len(),
            average: average_rating(games),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreSlice {
    pub genre: String,
    pub count: usize,
}

/// Most frequent genres in a filtered view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreDistribution {
    slices: Vec<GenreSlice>,
}

impl GenreDistribution {
    /// Count genre occurrences across `games` and keep the top `limit`
    ///
    /// Ordered by count, highest first; equal counts keep first-seen order.
    pub fn from_games(games: &[GameRecord], limit: usize) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut slices: Vec<GenreSlice> = Vec::new();

        for genre in games.iter().flat_map(|game| game.genres.iter()) {
            match index.get(genre.as_str()) {
                Some(&i) => slices[i].count += 1,
                None => {
                    index.insert(genre.as_str(), slices.len());
                    slices.push(GenreSlice {
                        genre: genre.clone(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps encounter order among ties
        slices.sort_by(|a, b| b.count.cmp(&a.count));
        slices.truncate(limit);

        Self { slices }
    }

    pub fn slices(&self) -> &[GenreSlice] {
        &self.slices
    }

    /// Nothing to chart
    pub fn is_insufficient(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|slice| slice.count).sum()
    }

    /// Fraction of the charted total held by `slice`
    pub fn share(&self, slice: &GenreSlice) -> f64 {
        match self.total() {
            0 => 0.0,
            total => slice.count as f64 / total as f64,
        }
    }
}
