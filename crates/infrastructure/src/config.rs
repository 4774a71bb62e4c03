//! Client configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `stockroom.toml`, then `STOCKROOM_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// File name looked up when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "stockroom.toml";

const ENV_PREFIX: &str = "STOCKROOM";

type FileSource = File<config::FileSourceFile, config::FileFormat>;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// No state directory was configured and the platform has none.
    #[error("no data directory available; set STOCKROOM_STATE_DIR")]
    NoStateDir,
}

/// Settings for one client instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Directory holding the token record. Defaults to the platform data dir.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Quiet period before a suggestion search is sent.
    pub search_debounce_ms: u64,
    /// Seconds before expiry at which the access token is reported as expiring.
    pub refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("stockroom/{}", env!("CARGO_PKG_VERSION")),
            state_dir: None,
            search_debounce_ms: 300,
            refresh_buffer_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Loads defaults, then `path` (or `stockroom.toml` in the working
    /// directory) if it exists, then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        Self::build(
            File::from(file).required(path.is_some()),
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn build(file: FileSource, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout = i64::try_from(defaults.timeout_secs).unwrap_or(i64::MAX);
        let debounce = i64::try_from(defaults.search_debounce_ms).unwrap_or(i64::MAX);

        let loaded: Self = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", timeout)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("search_debounce_ms", debounce)?
            .set_default("refresh_buffer_secs", defaults.refresh_buffer_secs)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "base_url",
                message: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.refresh_buffer_secs < 0 {
            return Err(ConfigError::Invalid {
                field: "refresh_buffer_secs",
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Suggestion debounce.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Where the token record lives.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoStateDir` if none is configured and the
    /// platform has no data directory.
    pub fn resolve_state_dir(&self) -> Result<PathBuf, ConfigError> {
        self.state_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("stockroom")))
            .ok_or(ConfigError::NoStateDir)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(source))
    }

    fn missing_file(dir: &Path) -> FileSource {
        File::from(dir.join("absent.toml")).required(false)
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::build(missing_file(dir.path()), env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.toml");
        std::fs::write(
            &path,
            "base_url = \"https://stock.example.com\"\ntimeout_secs = 5\nstate_dir = \"/srv/stockroom\"\n",
        )
        .unwrap();

        let config = ClientConfig::build(
            File::from(path).required(true),
            env(&[
                ("STOCKROOM_TIMEOUT_SECS", "12"),
                ("STOCKROOM_REFRESH_BUFFER_SECS", "300"),
            ]),
        )
        .unwrap();

        assert_eq!(config.base_url, "https://stock.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(config.refresh_buffer_secs, 300);
        assert_eq!(
            config.resolve_state_dir().unwrap(),
            PathBuf::from("/srv/stockroom")
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::build(
            missing_file(dir.path()),
            env(&[("STOCKROOM_BASE_URL", "ftp://files.example.com")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "base_url", .. }));
    }

    #[test]
    fn test_rejects_negative_refresh_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::build(
            missing_file(dir.path()),
            env(&[("STOCKROOM_REFRESH_BUFFER_SECS", "-5")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "refresh_buffer_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
