//! Configuration management for jogodash
//!
//! Handles the catalog connection, dashboard defaults, genre translation
//! overrides and log output, stored as TOML.

mod settings;

pub use settings::{DatabaseConfig, DisplayConfig, GenresConfig, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/jogodash";
pub const LOCAL_CONFIG_FILE: &str = "jogodash.toml";

/// Overrides `database.url` when set
pub const DATABASE_URL_ENV: &str = "JOGODASH_DATABASE_URL";

/// Main jogodash configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub dashboard: DisplayConfig,

    #[serde(default)]
    pub genres: GenresConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Working directory first, then system config
        let local_config = Path::new(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load(local_config);
        }

        let system_config = Path::new(CONFIG_DIR).join("config.toml");
        if system_config.exists() {
            return Self::load(&system_config);
        }

        tracing::warn!("No configuration file found, using defaults");
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check values the dashboard cannot work around
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path().trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".to_string()));
        }

        if !is_sql_identifier(&self.database.table) {
            return Err(ConfigError::Invalid(format!(
                "database.table {:?} is not a plain identifier",
                self.database.table
            )));
        }

        let step = self.dashboard.rating_step;
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dashboard.rating_step must be positive, got {}",
                step
            )));
        }

        let min = self.dashboard.default_min_rating;
        if !(0.0..=5.0).contains(&min) {
            return Err(ConfigError::Invalid(format!(
                "dashboard.default_min_rating must be within 0.0..=5.0, got {}",
                min
            )));
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if self.with_database_url(std::env::var(DATABASE_URL_ENV).ok()) {
            tracing::debug!("database.url taken from {}", DATABASE_URL_ENV);
        }
    }

    /// Replace `database.url` with a non-empty override; returns whether it did
    pub fn with_database_url(&mut self, url: Option<String>) -> bool {
        match url {
            Some(url) if !url.trim().is_empty() => {
                self.database.url = url;
                true
            }
            _ => false,
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, safe to splice into a query
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.database.table, "jogos");
        assert_eq!(config.dashboard.default_min_rating, 3.0);
        assert!(config.genres.translations.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = DashboardConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: DashboardConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.database.url, parsed.database.url);
        assert_eq!(config.dashboard.rating_step, parsed.dashboard.rating_step);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/jogodash/config.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[database]
url = "sqlite:///srv/jogos.db"
table = "catalogo"

[dashboard]
default_min_rating = 4.0

[genres.translations]
MOBA = "Arena"
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = DashboardConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.database.table, "catalogo");
        assert_eq!(config.dashboard.default_min_rating, 4.0);
        // Unset keys keep their defaults
        assert_eq!(config.dashboard.rating_step, 0.1);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.genres.translations.get("MOBA").map(String::as_str),
            Some("Arena")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load(Path::new("/nonexistent/jogodash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_bad_table() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[database]\ntable = \"jogos; DROP TABLE jogos\"\n").unwrap();

        let err = DashboardConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rating_bounds() {
        let mut config = DashboardConfig::default();
        config.dashboard.rating_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.dashboard.default_min_rating = 7.5;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.dashboard.default_min_rating = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = DashboardConfig::default();
        config.database.table = "games".to_string();

        config.save(temp_file.path()).unwrap();

        let loaded = DashboardConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded.database.table, "games");
    }

    #[test]
    fn test_database_url_override() {
        let mut config = DashboardConfig::default();

        assert!(config.with_database_url(Some("sqlite:///srv/catalogo.db".to_string())));
        assert_eq!(config.database.url, "sqlite:///srv/catalogo.db");
        assert_eq!(config.database.path(), "/srv/catalogo.db");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_override_ignored_when_unset_or_empty() {
        let mut config = DashboardConfig::default();
        let original = config.database.url.clone();

        assert!(!config.with_database_url(None));
        assert!(!config.with_database_url(Some(String::new())));
        assert!(!config.with_database_url(Some("   ".to_string())));
        assert_eq!(config.database.url, original);
    }

    #[test]
    fn test_sql_identifier() {
        assert!(is_sql_identifier("jogos"));
        assert!(is_sql_identifier("_games_2024"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("2games"));
        assert!(!is_sql_identifier("jogos\""));
        assert!(!is_sql_identifier("my table"));
    }
}
