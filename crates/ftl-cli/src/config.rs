//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ftl_core::rules::DEFAULT_HOME_BASE;
use ftl_core::{DutyBuffers, REGULATORY_LIMITS, RuleSet};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Arrival code that ends a flying day at home.
    pub home_base: String,

    /// Minutes added to the first takeoff to mark the start of duty.
    pub report_offset_minutes: i64,

    /// Minutes added to the last landing to mark the end of duty.
    pub release_offset_minutes: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("home_base", &self.home_base)
            .field("report_offset_minutes", &self.report_offset_minutes)
            .field("release_offset_minutes", &self.release_offset_minutes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let buffers = DutyBuffers::default();
        Self {
            database_path: data_dir.join("ftl.db"),
            home_base: DEFAULT_HOME_BASE.to_string(),
            report_offset_minutes: buffers.report_offset_minutes,
            release_offset_minutes: buffers.release_offset_minutes,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FTL_*)
        figment = figment.merge(Env::prefixed("FTL_"));

        figment.extract()
    }

    /// The rule set evaluations run under.
    pub fn rules(&self) -> RuleSet {
        RuleSet {
            home_base: self.home_base.trim().to_ascii_uppercase(),
            buffers: DutyBuffers {
                report_offset_minutes: self.report_offset_minutes,
                release_offset_minutes: self.release_offset_minutes,
            },
            limits: REGULATORY_LIMITS,
        }
    }
}

/// Returns the platform-specific config directory for ftl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ftl"))
}

/// Returns the platform-specific data directory for ftl.
///
/// On Linux: `~/.local/share/ftl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ftl"))
}
