//! # Engine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RIDEHUB_DB_PATH=./ridehub.db                                       │
//! │     RIDEHUB_ENRICHMENT_CONCURRENCY=32                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ridehub/ridehub.toml (Linux)                             │
//! │     ~/Library/Application Support/com.ridehub.ridehub/ridehub.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! database_path = "./ridehub.db"
//! max_connections = 5
//!
//! [discovery]
//! enrichment_concurrency = 16   # vehicles enriched in flight
//!
//! [booking]
//! utc_offset_minutes = 480      # UTC+08:00
//! ```

use ridehub_core::datetime::DateTimeResolver;
use ridehub_store::SqliteConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "ridehub", "ridehub")
        .map(|dirs| dirs.data_dir().join("ridehub.db"))
        .unwrap_or_else(|| PathBuf::from("./ridehub.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            database_path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Discovery Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Maximum number of vehicles whose supplier and ratings are loaded
    /// concurrently during one discovery call.
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

fn default_enrichment_concurrency() -> usize {
    16
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        DiscoverySettings {
            enrichment_concurrency: default_enrichment_concurrency(),
        }
    }
}

// =============================================================================
// Booking Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSettings {
    /// Offset east of UTC, in minutes, of the wall clock renters pick
    /// times on.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset_minutes() -> i32 {
    480
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub booking: BookingSettings,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ridehub.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.discovery.enrichment_concurrency == 0 {
            return Err(EngineError::Config(
                "enrichment_concurrency must be greater than 0".into(),
            ));
        }

        if self.store.max_connections == 0 {
            return Err(EngineError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        self.resolver()?;
        Ok(())
    }

    /// Applies `RIDEHUB_*` overrides; `lookup` is `std::env::var` outside
    /// tests.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RIDEHUB_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.store.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("RIDEHUB_MAX_CONNECTIONS") {
            match raw.parse() {
                Ok(n) => self.store.max_connections = n,
                Err(_) => warn!(value = %raw, "Ignoring invalid RIDEHUB_MAX_CONNECTIONS"),
            }
        }

        if let Some(raw) = lookup("RIDEHUB_ENRICHMENT_CONCURRENCY") {
            match raw.parse() {
                Ok(n) => {
                    debug!(concurrency = n, "Overriding enrichment concurrency from environment");
                    self.discovery.enrichment_concurrency = n;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid RIDEHUB_ENRICHMENT_CONCURRENCY"),
            }
        }

        if let Some(raw) = lookup("RIDEHUB_UTC_OFFSET_MINUTES") {
            match raw.parse() {
                Ok(n) => self.booking.utc_offset_minutes = n,
                Err(_) => warn!(value = %raw, "Ignoring invalid RIDEHUB_UTC_OFFSET_MINUTES"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ridehub", "ridehub")
            .map(|dirs| dirs.config_dir().join("ridehub.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// SQLite settings for [`ridehub_store::SqliteStore::connect`].
    pub fn sqlite_config(&self) -> SqliteConfig {
        SqliteConfig::new(self.store.database_path.clone())
            .max_connections(self.store.max_connections)
    }

    /// Date/time resolver for the configured wall-clock offset.
    pub fn resolver(&self) -> EngineResult<DateTimeResolver> {
        Ok(DateTimeResolver::from_offset_minutes(
            self.booking.utc_offset_minutes,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.discovery.enrichment_concurrency, 16);
        assert_eq!(config.booking.utc_offset_minutes, 480);
        assert_eq!(config.store.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [discovery]
            enrichment_concurrency = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.discovery.enrichment_concurrency, 4);
        assert_eq!(config.booking.utc_offset_minutes, 480);
    }

    #[test]
    fn test_validation() {
        let mut config = EngineConfig::default();
        config.discovery.enrichment_concurrency = 0;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        let mut config = EngineConfig::default();
        config.booking.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("RIDEHUB_DB_PATH", "/tmp/override.db"),
            ("RIDEHUB_ENRICHMENT_CONCURRENCY", "32"),
            ("RIDEHUB_UTC_OFFSET_MINUTES", "not-a-number"),
        ]);
        let mut config = EngineConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.store.database_path, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.discovery.enrichment_concurrency, 32);
        assert_eq!(config.booking.utc_offset_minutes, 480);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("ridehub-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[booking]\nutc_offset_minutes = 0\n").unwrap();

        let config = EngineConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.booking.utc_offset_minutes, 0);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&EngineConfig::default()).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[discovery]"));
        assert!(toml_str.contains("[booking]"));
    }
}
