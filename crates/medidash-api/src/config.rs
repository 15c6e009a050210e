//! # Dashboard Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDIDASH_API_URL=https://api.clinic.example/api                    │
//! │     MEDIDASH_TAX_RATE_BPS=1500                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/medidash/dashboard.toml (Linux)                          │
//! │     ~/Library/Application Support/com.medidash.dashboard/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.clinic.example/api/"
//! timeout_secs = 30
//!
//! [pos]
//! tax_rate_bps = 0
//!
//! [session]
//! poll_interval_secs = 60
//!
//! [locale]
//! default = "en"
//! supported = ["en", "ar"]
//!
//! [storage]
//! database_path = "/var/lib/medidash/medidash.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use medidash_core::navigation::LocalePolicy;
use medidash_core::validation::validate_tax_rate_bps;
use medidash_core::TaxRate;

use crate::error::{ConfigError, ConfigResult};

const CONFIG_FILE: &str = "dashboard.toml";
const DATABASE_FILE: &str = "medidash.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the REST API. Endpoint paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000/api/".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosSettings {
    /// Sales tax in basis points. 0 unless the deployment sets one.
    #[serde(default)]
    pub tax_rate_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How often the active register session is re-fetched (seconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    60
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSettings {
    #[serde(default = "default_locale")]
    pub default: String,

    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_supported_locales() -> Vec<String> {
    vec!["en".to_string(), "ar".to_string()]
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            default: default_locale(),
            supported: default_supported_locales(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Snapshot database file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub pos: PosSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub locale: LocaleSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl DashboardConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (dashboard.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dashboard config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load dashboard config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Dashboard config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.session.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "poll_interval_secs must be greater than 0".into(),
            ));
        }

        if !self.locale.supported.contains(&self.locale.default) {
            return Err(ConfigError::InvalidConfig(format!(
                "default locale '{}' is not in the supported list",
                self.locale.default
            )));
        }

        validate_tax_rate_bps(self.pos.tax_rate_bps)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies `MEDIDASH_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MEDIDASH_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(v) = lookup("MEDIDASH_API_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %v, "Ignoring invalid MEDIDASH_API_TIMEOUT_SECS"),
            }
        }

        if let Some(v) = lookup("MEDIDASH_TAX_RATE_BPS") {
            match v.parse() {
                Ok(bps) => self.pos.tax_rate_bps = bps,
                Err(_) => warn!(value = %v, "Ignoring invalid MEDIDASH_TAX_RATE_BPS"),
            }
        }

        if let Some(v) = lookup("MEDIDASH_POLL_INTERVAL_SECS") {
            match v.parse() {
                Ok(secs) => self.session.poll_interval_secs = secs,
                Err(_) => warn!(value = %v, "Ignoring invalid MEDIDASH_POLL_INTERVAL_SECS"),
            }
        }

        if let Some(locale) = lookup("MEDIDASH_DEFAULT_LOCALE") {
            self.locale.default = locale;
        }

        if let Some(path) = lookup("MEDIDASH_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "medidash", "dashboard")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pos.tax_rate_bps)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.session.poll_interval_secs)
    }

    pub fn locale_policy(&self) -> LocalePolicy {
        LocalePolicy {
            supported: self.locale.supported.clone(),
            default: self.locale.default.clone(),
        }
    }

    /// Configured path, else the platform data dir, else the working dir.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database_path {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate().bps(), 0);
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.locale_policy(), LocalePolicy::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = DashboardConfig::default();

        config.api.base_url = "ws://localhost:4000".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config = DashboardConfig::default();
        config.session.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        config = DashboardConfig::default();
        config.locale.default = "fr".into();
        assert!(config.validate().is_err());

        config = DashboardConfig::default();
        config.pos.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MEDIDASH_API_URL", "https://api.clinic.test/api/"),
            ("MEDIDASH_TAX_RATE_BPS", "1500"),
            ("MEDIDASH_POLL_INTERVAL_SECS", "soon"),
            ("MEDIDASH_DB_PATH", "/tmp/md.db"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.clinic.test/api/");
        assert_eq!(config.pos.tax_rate_bps, 1500);
        assert_eq!(config.session.poll_interval_secs, 60);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/md.db"));
    }

    #[test]
    fn test_file_roundtrip_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "[pos]\ntax_rate_bps = 500\n").unwrap();

        let loaded: DashboardConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.pos.tax_rate_bps, 500);
        assert_eq!(loaded.api, ApiSettings::default());

        let out = dir.path().join("nested").join("saved.toml");
        loaded.save(Some(out.clone())).unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("[api]"));
        assert!(text.contains("tax_rate_bps = 500"));
    }
}
