//! Integration tests for catalog loading, filtering and metrics

use jogodash_config::{DashboardConfig, DatabaseConfig};
use jogodash_library::{
    AverageRating, CatalogCache, DISTRIBUTION_LIMIT, DisplayMode, GameDatabase, GenreDistribution,
    GenreTranslator, LibraryError, Summary, TOP_LIMIT, encode_list, filter_games,
};
use rusqlite::{Connection, params};
use std::path::PathBuf;
use tempfile::TempDir;

/// Catalog database in a temporary directory
struct CatalogTestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CatalogTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("jogos.db");

        let conn = Connection::open(&db_path).expect("Failed to create database");
        conn.execute_batch(
            r#"
            CREATE TABLE jogos (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                rating REAL,
                genres TEXT,
                team TEXT,
                summary TEXT
            );
        "#,
        )
        .expect("Failed to create table");

        Self { temp_dir, db_path }
    }

    fn insert(&self, title: &str, rating: f64, genres_raw: &str) {
        let conn = Connection::open(&self.db_path).unwrap();
        conn.execute(
            "INSERT INTO jogos (title, rating, genres, team, summary) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![title, rating, genres_raw, "['Studio']", format!("Sobre {}", title)],
        )
        .unwrap();
    }

    fn insert_genres(&self, title: &str, rating: f64, genres: &[&str]) {
        self.insert(title, rating, &encode_list(genres));
    }

    fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: format!("sqlite://{}", self.db_path.display()),
            table: "jogos".to_string(),
        }
    }

    fn open(&self) -> GameDatabase {
        GameDatabase::open(&self.database_config(), GenreTranslator::default())
            .expect("Failed to open catalog")
    }
}

#[test]
fn test_scenario_rating_filter_and_average() {
    let env = CatalogTestEnv::new();
    env.insert_genres("A", 4.5, &["Action"]);
    env.insert_genres("B", 2.0, &["Action"]);

    let catalog = env.open().load_games().unwrap();
    assert_eq!(catalog.genres(), vec!["Ação"]);

    let outcome = filter_games(catalog.games(), "Ação", 3.0, DisplayMode::All);
    let titles: Vec<&str> = outcome.games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["A"]);

    let summary = Summary::of(&outcome.games);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.average, AverageRating::Value(4.5));
}

#[test]
fn test_scenario_nothing_left() {
    let env = CatalogTestEnv::new();
    env.insert_genres("A", 4.5, &["Action"]);
    env.insert_genres("B", 2.0, &["Action"]);

    let catalog = env.open().load_games().unwrap();
    let outcome = filter_games(catalog.games(), "Ação", 5.0, DisplayMode::All);

    assert!(outcome.is_empty());
    assert_eq!(Summary::of(&outcome.games).average.to_string(), "N/A");
    assert!(GenreDistribution::from_games(&outcome.games, DISTRIBUTION_LIMIT).is_insufficient());
}

#[test]
fn test_scenario_top10_of_fifteen() {
    let env = CatalogTestEnv::new();
    for i in 0..15 {
        let rating = 3.0 + (i as f64 * 0.13) % 2.0;
        env.insert_genres(&format!("Jogo {:02}", i), rating, &["RPG", "Strategy"]);
    }

    let catalog = env.open().load_games().unwrap();
    let outcome = filter_games(catalog.games(), "RPG", 3.0, DisplayMode::Top10);

    assert_eq!(outcome.len(), TOP_LIMIT);
    assert!(!outcome.short_of_limit);
    let ratings: Vec<f64> = outcome.games.iter().filter_map(|g| g.rating).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));

    let dist = GenreDistribution::from_games(&outcome.games, DISTRIBUTION_LIMIT);
    let genres: Vec<&str> = dist.slices().iter().map(|s| s.genre.as_str()).collect();
    assert_eq!(genres, vec!["RPG", "Estratégia"]);
    assert_eq!(dist.total(), 20);
}

#[test]
fn test_scenario_malformed_genres_never_match() {
    let env = CatalogTestEnv::new();
    env.insert("Quebrado", 4.9, "not-a-list");
    env.insert_genres("Inteiro", 4.0, &["Action"]);

    let catalog = env.open().load_games().unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.games()[0].genres.is_empty());
    assert_eq!(catalog.report().malformed_genres, 1);

    for genre in catalog.genres() {
        let outcome = filter_games(catalog.games(), &genre, 0.0, DisplayMode::All);
        assert!(outcome.games.iter().all(|g| g.title != "Quebrado"));
    }
}

#[test]
fn test_scenario_unmapped_genre_passes_through() {
    let env = CatalogTestEnv::new();
    env.insert_genres("Dota 2", 4.1, &["MOBA", "Strategy"]);

    let catalog = env.open().load_games().unwrap();
    assert_eq!(catalog.genres(), vec!["Estratégia", "MOBA"]);

    let outcome = filter_games(catalog.games(), "MOBA", 0.0, DisplayMode::All);
    assert_eq!(outcome.len(), 1);

    let dist = GenreDistribution::from_games(&outcome.games, DISTRIBUTION_LIMIT);
    assert!(dist.slices().iter().any(|s| s.genre == "MOBA"));
}

#[test]
fn test_pass_through_columns_survive_load() {
    let env = CatalogTestEnv::new();
    env.insert_genres("Celeste", 4.6, &["Platformer"]);

    let catalog = env.open().load_games().unwrap();
    let game = &catalog.games()[0];
    assert_eq!(game.team, vec!["Studio"]);
    assert_eq!(
        game.extra.get("summary").and_then(|v| v.as_str()),
        Some("Sobre Celeste")
    );
}

#[test]
fn test_cache_does_not_requery_until_reload() {
    let env = CatalogTestEnv::new();
    env.insert_genres("Primeiro", 4.0, &["Action"]);

    let mut cache = CatalogCache::new(env.open());
    assert_eq!(cache.get().unwrap().len(), 1);

    env.insert_genres("Segundo", 4.2, &["Action"]);
    assert_eq!(cache.get().unwrap().len(), 1);
    assert_eq!(cache.load_count(), 1);

    assert_eq!(cache.reload().unwrap().len(), 2);
    assert_eq!(cache.load_count(), 2);
}

#[test]
fn test_load_leaves_store_unchanged() {
    let env = CatalogTestEnv::new();
    env.insert_genres("A", 4.5, &["Action"]);

    let db = env.open();
    let first = db.load_games().unwrap();
    let second = db.load_games().unwrap();
    assert_eq!(first.games(), second.games());

    let conn = Connection::open(&env.db_path).unwrap();
    let raw: String = conn
        .query_row("SELECT genres FROM jogos WHERE title = 'A'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(raw, "['Action']");
}

#[test]
fn test_missing_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: temp_dir.path().join("absent.db").display().to_string(),
        table: "jogos".to_string(),
    };

    let result = GameDatabase::open(&config, GenreTranslator::default());
    assert!(matches!(result, Err(LibraryError::DatabaseNotFound(_))));
}

#[test]
fn test_missing_table_fails_whole_load() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vazio.db");
    Connection::open(&db_path)
        .unwrap()
        .execute_batch("CREATE TABLE outra (x INTEGER);")
        .unwrap();

    let config = DatabaseConfig {
        url: db_path.display().to_string(),
        table: "jogos".to_string(),
    };
    let db = GameDatabase::open(&config, GenreTranslator::default()).unwrap();
    assert!(matches!(db.load_games(), Err(LibraryError::Sqlite(_))));
}

#[test]
fn test_open_from_full_config_with_extra_translation() {
    let env = CatalogTestEnv::new();
    env.insert_genres("Dota 2", 4.1, &["MOBA"]);

    let mut config = DashboardConfig::default();
    config.database = env.database_config();
    config
        .genres
        .translations
        .insert("MOBA".to_string(), "Arena de Batalha".to_string());

    let catalog = GameDatabase::from_config(&config).unwrap().load_games().unwrap();
    assert_eq!(catalog.games()[0].genres, vec!["Arena de Batalha"]);
}
