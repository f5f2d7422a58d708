//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ia_core::{HoldTiming, RecorderOptions};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Key handed to the backend before recording.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Trace every stat at `info` level before it is sent.
    #[serde(default)]
    pub verbose_logging: bool,

    /// Which timer completed holds are measured with.
    #[serde(default)]
    pub hold_timing: HoldTiming,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("verbose_logging", &self.verbose_logging)
            .field("hold_timing", &self.hold_timing)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("ia.db"),
            api_key: None,
            verbose_logging: false,
            hold_timing: HoldTiming::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default locations, then `config_path`
    /// if given, then `IA_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // IA_DATABASE_PATH, IA_API_KEY, ...
        figment = figment.merge(Env::prefixed("IA_"));

        figment.extract()
    }

    pub const fn recorder_options(&self) -> RecorderOptions {
        RecorderOptions {
            verbose_logging: self.verbose_logging,
            hold_timing: self.hold_timing,
        }
    }
}

/// Returns the platform-specific config directory for ia.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ia"))
}

/// Returns the platform-specific data directory for ia.
///
/// On Linux: `~/.local/share/ia`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ia"))
}
