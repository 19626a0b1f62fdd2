//! Client configuration
//!
//! Settings are layered: built-in defaults, then an optional file (TOML or
//! YAML, picked by extension), then `BACKOFFICE_*` environment variables.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the API client and its front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Backend API root, e.g. `http://localhost:8000/api`
    pub base_url: String,

    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Where to persist session tokens; defaults to the state directory
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    /// Log level filter (e.g. "info", "debug")
    pub log_level: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("backoffice-client/{}", env!("CARGO_PKG_VERSION")),
            token_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClientSettings {
    /// Backend used when nothing else is configured
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";

    /// Environment variable prefix
    pub const ENV_PREFIX: &'static str = "BACKOFFICE";

    /// Load configuration with defaults, an optional file and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings are invalid
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the base URL is an absolute http(s) URL
    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            CoreError::invalid_config(format!("base_url '{}': {e}", self.base_url))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CoreError::invalid_config(format!(
                "base_url must use http or https, got '{other}'"
            ))),
        }
    }

    /// Request timeout, if enabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Render the settings as TOML for `config init`
    pub fn to_toml(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url, "http://localhost:8000/api");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.toml");
        std::fs::write(
            &path,
            "base_url = \"https://erp.example.com/api\"\ntimeout_secs = 0\n",
        )
        .unwrap();

        let settings = ClientSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.base_url, "https://erp.example.com/api");
        assert_eq!(settings.timeout(), None);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let settings = ClientSettings {
            base_url: "ftp://example.com/api".to_string(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));

        let settings = ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_generated_toml_round_trips_through_loader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.toml");
        let settings = ClientSettings {
            token_file: Some(temp_dir.path().join("session.json")),
            ..ClientSettings::default()
        };
        std::fs::write(&path, settings.to_toml().unwrap()).unwrap();

        let loaded = ClientSettings::load(Some(&path)).unwrap();
        assert_eq!(loaded.base_url, settings.base_url);
        assert_eq!(loaded.token_file, settings.token_file);
    }
}
