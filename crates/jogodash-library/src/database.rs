//! Catalog loading from SQLite

use crate::cache::CatalogSource;
use crate::catalog::{Catalog, GameRecord, LoadReport};
use crate::genres::GenreTranslator;
use crate::literal::decode_list;
use crate::LibraryError;
use jogodash_config::{DashboardConfig, DatabaseConfig, is_sql_identifier};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns every catalog table must have
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "rating", "genres", "team"];

/// Read-only handle on the catalog table
pub struct GameDatabase {
    conn: Connection,
    table: String,
    translator: GenreTranslator,
}

impl GameDatabase {
    /// Open the database named by the configuration, read-only
    pub fn open(config: &DatabaseConfig, translator: GenreTranslator) -> Result<Self, LibraryError> {
        if let Some((scheme, _)) = config.url.split_once("://") {
            if scheme != "sqlite" {
                return Err(LibraryError::Database(format!(
                    "unsupported database scheme {:?}, expected sqlite",
                    scheme
                )));
            }
        }

        let path = Path::new(config.path());
        if !path.exists() {
            return Err(LibraryError::DatabaseNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        info!("Opened catalog database {}", path.display());

        Self::from_connection(conn, &config.table, translator)
    }

    /// Open using the database and genre sections of a full configuration
    pub fn from_config(config: &DashboardConfig) -> Result<Self, LibraryError> {
        let translator = GenreTranslator::with_extra(&config.genres.translations)?;
        Self::open(&config.database, translator)
    }

    /// Wrap an existing connection
    pub fn from_connection(
        conn: Connection,
        table: &str,
        translator: GenreTranslator,
    ) -> Result<Self, LibraryError> {
        if !is_sql_identifier(table) {
            return Err(LibraryError::InvalidTable(table.to_string()));
        }

        Ok(Self {
            conn,
            table: table.to_string(),
            translator,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Read the whole table into a catalog
    ///
    /// Fails only when the query itself fails or a required column is
    /// missing. Cells that cannot be decoded degrade to empty values and are
    /// counted in the catalog's [`LoadReport`].
    pub fn load_games(&self) -> Result<Catalog, LibraryError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM \"{}\"", self.table))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| LibraryError::MissingColumn {
                    table: self.table.clone(),
                    column: name.to_string(),
                })
        };
        let title_idx = position("title")?;
        let rating_idx = position("rating")?;
        let genres_idx = position("genres")?;
        let team_idx = position("team")?;

        let mut games = Vec::new();
        let mut report = LoadReport::default();
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let row_no = report.rows;
            report.rows += 1;

            let title = text_of(row.get_ref(title_idx)?).unwrap_or_default();
            let mut degraded = false;

            let rating = rating_of(row.get_ref(rating_idx)?);
            if rating.is_none() {
                debug!(row = row_no, title = %title, "rating missing or not numeric");
                report.missing_ratings += 1;
                degraded = true;
            }

            let genres = match list_of(row.get_ref(genres_idx)?) {
                Ok(genres) => self.translator.translate_all(genres),
                Err(reason) => {
                    debug!(row = row_no, title = %title, %reason, "genres degraded to empty");
                    report.malformed_genres += 1;
                    degraded = true;
                    Vec::new()
                }
            };

            let team = match list_of(row.get_ref(team_idx)?) {
                Ok(team) => team,
                Err(reason) => {
                    debug!(row = row_no, title = %title, %reason, "team degraded to empty");
                    report.malformed_team += 1;
                    degraded = true;
                    Vec::new()
                }
            };

            if degraded {
                report.degraded_rows += 1;
            }

            let mut extra = BTreeMap::new();
            for (idx, name) in columns.iter().enumerate() {
                if [title_idx, rating_idx, genres_idx, team_idx].contains(&idx) {
                    continue;
                }
                extra.insert(name.clone(), json_of(row.get_ref(idx)?));
            }

            games.push(GameRecord {
                title,
                rating,
                genres,
                team,
                extra,
            });
        }

        info!("Loaded {} games from table {}", games.len(), self.table);
        if !report.is_clean() {
            warn!(
                "{} of {} rows loaded degraded ({} genres, {} team, {} ratings)",
                report.degraded_rows,
                report.rows,
                report.malformed_genres,
                report.malformed_team,
                report.missing_ratings
            );
        }

        Ok(Catalog::new(games, report))
    }
}

impl CatalogSource for GameDatabase {
    fn load_catalog(&self) -> Result<Catalog, LibraryError> {
        self.load_games()
    }
}

fn text_of(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn rating_of(value: ValueRef<'_>) -> Option<f64> {
    let rating = match value {
        ValueRef::Integer(i) => i as f64,
        ValueRef::Real(f) => f,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok()?,
        ValueRef::Null | ValueRef::Blob(_) => return None,
    };
    rating.is_finite().then_some(rating)
}

fn list_of(value: ValueRef<'_>) -> Result<Vec<String>, String> {
    match value {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
            decode_list(text).map_err(|e| e.to_string())
        }
        ValueRef::Null => Err("NULL cell".to_string()),
        ValueRef::Integer(_) | ValueRef::Real(_) => Err("numeric cell".to_string()),
        ValueRef::Blob(_) => Err("blob cell".to_string()),
    }
}

fn json_of(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Blob(bytes) => serde_json::Value::from(bytes.to_vec()),
    }
}
