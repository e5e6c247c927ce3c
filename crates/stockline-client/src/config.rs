//! # Client Configuration
//!
//! Where the backend lives and who is ringing up sales.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKLINE_API_URL=http://10.0.0.5:8080/api/                        │
//! │     STOCKLINE_SALE_BY=3                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/console/config.toml (Linux)                              │
//! │     ~/Library/Application Support/com.stockline.console/config.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local backend on :8080, analytics on :8000                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8080/api/"
//! analytics_url = "http://127.0.0.1:8000/"
//! timeout_secs = 10
//!
//! [session]
//! sale_by = 1
//! currency_symbol = "$"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base of the inventory, order and sales endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base of the analytics service (`getAll`).
    #[serde(default = "default_analytics_url")]
    pub analytics_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api/".to_string()
}

fn default_analytics_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            analytics_url: default_analytics_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Employee id recorded on every sale report.
    #[serde(default = "default_sale_by")]
    pub sale_by: i64,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_sale_by() -> i64 {
    1
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            sale_by: default_sale_by(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Client Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Loads configuration: defaults, then the file, then the environment.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ClientResult<()> {
        self.api_base()?;
        self.analytics_base()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOCKLINE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(url) = std::env::var("STOCKLINE_ANALYTICS_URL") {
            debug!(url = %url, "Overriding analytics URL from environment");
            self.api.analytics_url = url;
        }

        if let Ok(secs) = std::env::var("STOCKLINE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric STOCKLINE_TIMEOUT_SECS"),
            }
        }

        if let Ok(id) = std::env::var("STOCKLINE_SALE_BY") {
            match id.parse::<i64>() {
                Ok(v) => self.session.sale_by = v,
                Err(_) => warn!(value = %id, "Ignoring non-numeric STOCKLINE_SALE_BY"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockline", "console")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn api_base(&self) -> ClientResult<Url> {
        parse_base_url(&self.api.base_url)
    }

    pub fn analytics_base(&self) -> ClientResult<Url> {
        parse_base_url(&self.api.analytics_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn sale_by(&self) -> i64 {
        self.session.sale_by
    }
}

/// Parses an http(s) base URL, adding the trailing slash `Url::join`
/// needs to keep the last path segment.
fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }

    let url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!(
            "URL must start with http:// or https://, got {}://",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.api_base().unwrap().as_str(),
            "http://127.0.0.1:8080/api/"
        );
        assert_eq!(config.sale_by(), 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let mut config = ClientConfig::default();
        config.api.analytics_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(url.join("get_inventory").unwrap().as_str(), "http://localhost:8080/api/get_inventory");
    }

    #[test]
    fn test_toml_partial_file() {
        let config: ClientConfig = toml::from_str(
            r#"
            [session]
            sale_by = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.sale_by(), 42);
        assert_eq!(config.api, ApiSettings::default());
        assert_eq!(config.session.currency_symbol, "$");
    }

    #[test]
    fn test_toml_serialization() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_missing_explicit_path_uses_defaults() {
        let path = std::env::temp_dir().join("stockline-no-such-config.toml");
        let config = ClientConfig::load_or_default(Some(path));
        assert_eq!(config.api.timeout_secs, ClientConfig::default().api.timeout_secs);
    }
}
