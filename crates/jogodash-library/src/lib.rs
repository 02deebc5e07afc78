//! Game catalog service for jogodash
//!
//! Loads the `jogos` table once, decodes its serialized list columns,
//! translates genres to the display locale, and derives the filtered views
//! and metrics the dashboard draws.

mod cache;
mod catalog;
mod database;
mod filter;
mod genres;
mod literal;
mod stats;

pub use cache::{CatalogCache, CatalogSource};
pub use catalog::{Catalog, GameRecord, LoadReport};
pub use database::{GameDatabase, REQUIRED_COLUMNS};
pub use filter::{DisplayMode, FilterOutcome, TOP_LIMIT, filter_games};
pub use genres::{GENRE_TRANSLATIONS, GenreTranslator, translate};
pub use literal::{DecodeError, decode_list, decode_list_or_empty, encode_list};
pub use stats::{
    AverageRating, DISTRIBUTION_LIMIT, GenreDistribution, GenreSlice, Summary, average_rating,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database not found: {0}")]
    DatabaseNotFound(PathBuf),

    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("Table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    #[error("Invalid genre translation: {0}")]
    InvalidTranslation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
