//! Configuration file discovery and loading
//!
//! When a caller does not hand over a configuration, it is read from
//! `protected.json` at the project root.

use std::io;
use std::path::{Path, PathBuf};

use super::{Config, ValidatedConfig};
use crate::error::{Error, Result};

/// Standard configuration file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "protected.json";

/// Path of the fallback configuration file for a project
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load configuration from the specified path
///
/// A missing file is reported as [`Error::ConfigNotFound`]; unparsable
/// content as [`Error::ConfigValidation`].
pub fn load_config(path: &Path) -> Result<Config> {
    tracing::debug!("Loading configuration from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
        _ => Error::io(path, e),
    })?;

    Config::from_json(&content).map_err(|e| match e {
        Error::ConfigValidation(msg) => Error::ConfigValidation(format!(
            "Failed to parse configuration file '{}': {}",
            path.display(),
            msg
        )),
        other => other,
    })
}

/// Load `protected.json` from the project root
pub fn load_project_config(root: &Path) -> Result<Config> {
    load_config(&project_config_path(root))
}

/// Use the supplied configuration, or fall back to the project's file, and validate it
pub fn resolve_config(root: &Path, config: Option<Config>) -> Result<ValidatedConfig> {
    let config = match config {
        Some(config) => config,
        None => load_project_config(root)?,
    };
    config.validate()
}
