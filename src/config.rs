//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/wstoggle/config.json`.
//! Every field is optional; a missing file or a minimal `{}` file falls back
//! to the compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "host_file": "/home/me/.local/share/wstoggle/host.json",
//!   "action": {
//!     "name": "toggle_workspaces",
//!     "annotation": "Toggle favorited workspaces",
//!     "command": "wstoggle toggle"
//!   }
//! }
//! ```

use crate::traits::NamedAction;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// State file of the local host.  Defaults to
    /// `$XDG_DATA_HOME/wstoggle/host.json`.
    #[serde(default)]
    pub host_file: Option<PathBuf>,

    /// The host action the hotkey is bound to.
    #[serde(default)]
    pub action: ActionConfig,
}

/// The named host action the hotkey triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub name: String,
    pub annotation: String,
    /// What the host runs when the hotkey fires.
    pub command: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            name: "toggle_workspaces".into(),
            annotation: "Toggle favorited workspaces".into(),
            command: "wstoggle toggle".into(),
        }
    }
}

impl ActionConfig {
    pub fn to_action(&self) -> NamedAction {
        NamedAction {
            name: self.name.clone(),
            annotation: self.annotation.clone(),
            command: self.command.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read(format!("failed to read {}: {}", path.display(), e)),
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// The host state file, falling back to `default_dir/host.json`.
    pub fn host_file_or(&self, default_dir: &Path) -> PathBuf {
        self.host_file
            .clone()
            .unwrap_or_else(|| default_dir.join("host.json"))
    }
}

/// Error from loading or parsing a configuration file.
///
/// Only [`NotFound`](ConfigError::NotFound) means "use the defaults"; the
/// other variants are real configuration mistakes.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("config error: {0}")]
    Read(String),
    #[error("config error: {0}")]
    Parse(String),
}
