//! Entry point for the **wstoggle** binary.
//!
//! Opens the local host state file, parses one [`Command`] from the
//! arguments and runs it.  Bind `wstoggle toggle` (or plain `wstoggle`) to
//! the hotkey to cycle layouts.

use log::{debug, error, info};
use std::path::PathBuf;
use wstoggle::app::App;
use wstoggle::command::{Command, USAGE};
use wstoggle::config::{Config, ConfigError};
use wstoggle::local::host::LocalHost;

/// Resolve the config directory (`$XDG_CONFIG_HOME/wstoggle`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("wstoggle")
}

/// Resolve the data directory (`$XDG_DATA_HOME/wstoggle`).
fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.local/share", home)
    });
    PathBuf::from(base).join("wstoggle")
}

/// Load the config from `$XDG_CONFIG_HOME/wstoggle/config.json`.
///
/// A missing file falls back to compiled-in defaults; an unreadable or
/// malformed one is an error.
fn load_config() -> Result<Config, ConfigError> {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(ConfigError::NotFound(_)) => {
            debug!("no config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn main() {
    env_logger::init();

    let cmd = match Command::parse(std::env::args().skip(1)) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let host_file = config.host_file_or(&data_dir());
    let host = match LocalHost::open(&host_file) {
        Ok(host) => host,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    debug!("running {} against {}", cmd, host_file.display());
    let app = App::new(&host, config.action.to_action());
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = app.handle(cmd, &mut stdout) {
        error!("{}", e);
        std::process::exit(1);
    }
}
