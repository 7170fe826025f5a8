//! `config.json` loading. Command-line flags override file values.

use std::fs;
use std::path::Path;

use helpdesk_lib::table::TableConfig;
use log::debug;
use serde::Deserialize;

use crate::error::CliError;
use crate::paths;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend root, e.g. `https://helpdesk.example.com/api`.
    pub base_url: Option<String>,
    /// Bearer token of the session.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Defaults for every rendered table.
    pub table: TableConfig,
}

impl Config {
    /// Load from `path`, or the platform config file if `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match paths::config_file() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
        let config = serde_json::from_str(&text).map_err(|e| CliError::json(&path, e))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
