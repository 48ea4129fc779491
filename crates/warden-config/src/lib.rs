//! TOML configuration for Warden.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use warden_types::{ConfigError, PrincipalId};

/// Default seed for a freshly configured counter.
pub const DEFAULT_COUNTER_SEED: i64 = 1;

/// Resolved configuration for a Warden process.
#[derive(Debug, Clone)]
pub struct WardenConfig {
    /// The bootstrap owner: guaranteed to hold the owner role at startup.
    pub owner_id: PrincipalId,
    /// Directory holding the persisted stores and the config file.
    pub state_dir: PathBuf,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub bot: BotSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotSettings {
    pub owner_id: Option<u64>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub owner_id: Option<u64>,
    pub state_dir: Option<PathBuf>,
}

impl WardenConfig {
    /// Load configuration from all sources, applying precedence rules.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables (`WARDEN_OWNER_ID`, `WARDEN_STATE_DIR`)
    /// 3. Config file (`<state_dir>/config.toml`)
    /// 4. Defaults
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let state_dir = overrides.state_dir.unwrap_or_else(state_dir);
        let settings = load_settings_file(&state_dir.join("config.toml"));

        let owner_id = match overrides.owner_id {
            Some(id) => Some(id),
            None => match std::env::var("WARDEN_OWNER_ID") {
                Ok(raw) => Some(raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: "WARDEN_OWNER_ID".into(),
                    message: format!("not an integer: {raw}"),
                })?),
                Err(_) => settings.bot.owner_id,
            },
        };
        let owner_id = owner_id.ok_or_else(|| ConfigError::MissingKey {
            key: "owner_id (set WARDEN_OWNER_ID or add [bot] owner_id to config.toml)".into(),
        })?;

        Ok(WardenConfig {
            owner_id: PrincipalId(owner_id),
            state_dir,
        })
    }
}

/// Get the Warden state directory path (~/.warden/).
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WARDEN_STATE_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".warden")
}

/// Load and parse a TOML settings file, returning defaults on any error.
fn load_settings_file(path: &std::path::Path) -> SettingsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            SettingsFile::default()
        }),
        Err(_) => SettingsFile::default(),
    }
}
