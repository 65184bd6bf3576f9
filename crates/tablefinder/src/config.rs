//! Configuration management for tablefinder.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "tablefinder";

/// Published CSV export of the guest list.
const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSWx1lVogYUCffYh-s2sips9yysy8icxoUm1fWo-XgKeBmy3r7phiqpIdFUXVAZlE46To8YYhy-3TQO/pub?gid=1682242390&single=true&output=csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TABLEFINDER_`, sections split on `__`)
/// 2. TOML config file at `~/.config/tablefinder/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream sheet configuration.
    pub sheet: SheetConfig,
    /// Fuzzy matching configuration.
    pub matcher: MatcherConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Page content configuration.
    pub page: PageConfig,
}

/// Upstream sheet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// URL of the published CSV export.
    pub csv_url: String,
    /// Deadline for a single fetch, in seconds.
    pub timeout_secs: u64,
    /// Minimum interval between re-fetches, in seconds.
    pub cache_seconds: u64,
    /// Header of the column holding guest names.
    pub name_column: String,
    /// Header of the column holding table identifiers.
    pub table_column: String,
    /// Keep serving the last good dataset when a refresh fails.
    pub serve_stale_on_error: bool,
}

/// Fuzzy matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum acceptable match score (0-100).
    pub threshold: f64,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

/// Page content configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Event heading shown above the welcome line.
    pub heading: String,
    /// Path of the banner image, as referenced from the page.
    pub banner_path: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_SHEET_CSV_URL.to_string(),
            timeout_secs: 10,
            cache_seconds: 60,
            name_column: "Name".to_string(),
            table_column: "Table".to_string(),
            serve_stale_on_error: false,
        }
    }
}

impl SheetConfig {
    /// Get the fetch deadline as a Duration.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the cache interval as a Duration.
    #[must_use]
    pub fn cache_interval(&self) -> Duration {
        Duration::from_secs(self.cache_seconds)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { threshold: 60.0 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            heading: "🌸 MARIA LUCIA QUINCEAÑERA 🌸".to_string(),
            banner_path: "/static/lu15.png".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading `config_path` or the
    /// default file.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `TABLEFINDER_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TABLEFINDER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let url = self.sheet.csv_url.trim();
        if url.is_empty() {
            return Err(Error::config_validation("sheet.csv_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::config_validation(format!(
                "sheet.csv_url must be an http(s) URL, got: {url}"
            )));
        }

        if self.sheet.timeout_secs == 0 {
            return Err(Error::config_validation(
                "sheet.timeout_secs must be greater than 0",
            ));
        }

        if self.sheet.name_column.trim().is_empty() || self.sheet.table_column.trim().is_empty() {
            return Err(Error::config_validation(
                "sheet.name_column and sheet.table_column must not be empty",
            ));
        }
        if self.sheet.name_column == self.sheet.table_column {
            return Err(Error::config_validation(format!(
                "sheet.name_column and sheet.table_column must differ (both are '{}')",
                self.sheet.name_column
            )));
        }

        if !(0.0..=100.0).contains(&self.matcher.threshold) {
            return Err(Error::config_validation(format!(
                "matcher.threshold ({}) must be between 0 and 100",
                self.matcher.threshold
            )));
        }

        if self.server.port == 0 {
            return Err(Error::config_validation(
                "server.port must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Get the `host:port` pair the server binds.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.sheet.cache_seconds, 60);
        assert_eq!(config.sheet.timeout_secs, 10);
        assert!((config.matcher.threshold - 60.0).abs() < f64::EPSILON);
        assert!(!config.sheet.serve_stale_on_error);
    }

    #[test]
    fn test_default_sheet_config() {
        let sheet = SheetConfig::default();

        assert!(sheet.csv_url.starts_with("https://"));
        assert!(sheet.csv_url.contains("output=csv"));
        assert_eq!(sheet.name_column, "Name");
        assert_eq!(sheet.table_column, "Table");
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 5000);
        assert_eq!(server.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_default_page_config() {
        let page = PageConfig::default();

        assert!(page.heading.contains("QUINCEAÑERA"));
        assert_eq!(page.banner_path, "/static/lu15.png");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_url() {
        let mut config = Config::default();
        config.sheet.csv_url = "   ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("csv_url"));
    }

    #[test]
    fn test_validate_non_http_url() {
        let mut config = Config::default();
        config.sheet.csv_url = "file:///etc/passwd".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("http(s)"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.sheet.timeout_secs = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_validate_zero_cache_is_allowed() {
        let mut config = Config::default();
        config.sheet.cache_seconds = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_threshold_out_of_range() {
        let mut config = Config::default();
        config.matcher.threshold = 101.0;
        assert!(config.validate().is_err());

        config.matcher.threshold = -1.0;
        assert!(config.validate().is_err());

        config.matcher.threshold = 100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_same_columns() {
        let mut config = Config::default();
        config.sheet.table_column = "Name".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must differ"));
    }

    #[test]
    fn test_validate_empty_column() {
        let mut config = Config::default();
        config.sheet.name_column = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_durations() {
        let sheet = SheetConfig {
            timeout_secs: 3,
            cache_seconds: 0,
            ..SheetConfig::default()
        };

        assert_eq!(sheet.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(sheet.cache_interval(), Duration::ZERO);
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("tablefinder"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "tablefinder.toml",
                r#"
                [sheet]
                csv_url = "https://example.com/guests.csv"
                cache_seconds = 5

                [matcher]
                threshold = 75.0
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("tablefinder.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.sheet.csv_url, "https://example.com/guests.csv");
            assert_eq!(config.sheet.cache_seconds, 5);
            assert!((config.matcher.threshold - 75.0).abs() < f64::EPSILON);
            assert_eq!(config.sheet.timeout_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tablefinder.toml", "[server]\nport = 8080\n")?;
            jail.set_env("TABLEFINDER_SERVER__PORT", "9090");
            jail.set_env("TABLEFINDER_SHEET__NAME_COLUMN", "Guest");

            let config = Config::load_from(Some(PathBuf::from("tablefinder.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.sheet.name_column, "Guest");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("tablefinder.toml", "[matcher]\nthreshold = 250.0\n")?;

            let result = Config::load_from(Some(PathBuf::from("tablefinder.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_sheet_config_deserialize() {
        let json = r#"{"csv_url": "https://example.com/x.csv", "cache_seconds": 30}"#;
        let sheet: SheetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.cache_seconds, 30);
        assert_eq!(sheet.name_column, "Name");
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("csv_url"));
        assert!(json.contains("threshold"));
        assert!(json.contains("banner_path"));
    }
}
