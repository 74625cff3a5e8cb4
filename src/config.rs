//! User configuration, read once per action from a JSON file in the
//! user's home directory. Any problem loading it falls back to defaults;
//! configuration can never make an action fail.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Location of the config file; `~` expands to the user's home.
pub const CONFIG_PATH: &str = "~/.mdexec/config.json";

/// How executions are confirmed before anything reaches a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    /// Execute immediately.
    #[default]
    None,
    /// Two-entry picker (Execute / Cancel).
    Pick,
    /// Dismissable message with an Execute button.
    Message,
    /// Modal dialog.
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Switch from the era when a busy terminal was detected by process
    /// state and ssh foregrounds were special-cased. Session affinity
    /// replaced that logic; the key is still parsed so old config files
    /// keep loading. Nothing consults it.
    #[serde(default, rename = "executeInSsh")]
    pub execute_in_ssh: bool,
    #[serde(default)]
    pub confirmation: Confirmation,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            execute_in_ssh: false,
            confirmation: Confirmation::None,
        }
    }
}

#[instrument(name = "load_config")]
pub fn load_config() -> Config {
    load_config_from(&PathBuf::from(shellexpand::tilde(CONFIG_PATH).as_ref()))
}

/// Load configuration from `config_path`, falling back to defaults on a
/// missing, unreadable or unparsable file.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let raw = match std::fs::read_to_string(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&raw) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Failed to parse config, using defaults");
            Config::default()
        }
    }
}
