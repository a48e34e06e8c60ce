//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use tempo_core::DEFAULT_LOOKBACK_DAYS;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// How many days of history reports load by default.
    pub lookback_days: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("lookback_days", &self.lookback_days)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let database_path = tempo_db::Database::default_path()
            .unwrap_or_else(|| PathBuf::from("tempo.db"));
        Self {
            database_path,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[allow(clippy::result_large_err)]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    ///
    /// Layering, later wins: defaults, `config.toml` in the platform config
    /// dir, the explicit file, then `TEMPO_*` environment variables.
    #[allow(clippy::result_large_err)]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TEMPO_"));

        figment.extract()
    }
}

/// Platform-specific config directory for tempo.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tempo"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert!(config.database_path.to_string_lossy().ends_with("tempo.db"));
        assert_eq!(config.lookback_days, DEFAULT_LOOKBACK_DAYS);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_path = \"/tmp/custom.db\"").unwrap();
        writeln!(file, "lookback_days = 30").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.lookback_days, 30);
    }

    #[test]
    fn missing_explicit_file_falls_back_to_defaults() {
        let config = Config::load_from(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.lookback_days, DEFAULT_LOOKBACK_DAYS);
    }
}
