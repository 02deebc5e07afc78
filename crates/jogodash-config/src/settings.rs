//! Configuration sections

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Backing store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, `sqlite://<path>` or a bare file path
    #[serde(default = "default_url")]
    pub url: String,
    /// Relation holding the catalog
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_url() -> String {
    "sqlite://jogos.db".to_string()
}

fn default_table() -> String {
    "jogos".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            table: default_table(),
        }
    }
}

impl DatabaseConfig {
    /// Filesystem path the connection string points at
    pub fn path(&self) -> &str {
        self.url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))
            .unwrap_or(&self.url)
    }
}

/// Dashboard page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Page title shown in the header
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial value of the minimum rating control
    #[serde(default = "default_min_rating")]
    pub default_min_rating: f64,
    /// Increment applied by the minimum rating control
    #[serde(default = "default_rating_step")]
    pub rating_step: f64,
}

fn default_title() -> String {
    "Dashboard Interativo de Jogos".to_string()
}

fn default_min_rating() -> f64 {
    3.0
}

fn default_rating_step() -> f64 {
    0.1
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            default_min_rating: default_min_rating(),
            rating_step: default_rating_step(),
        }
    }
}

/// Extra genre translations layered over the built-in table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenresConfig {
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file; the terminal belongs to the dashboard
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "jogodash.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_log_file(),
        }
    }
}
