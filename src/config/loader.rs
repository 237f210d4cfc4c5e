// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation or path resolution. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// A relative `[tracker].directory` is resolved against the directory that
/// contains the config file, so configs can live next to the repository
/// they describe.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let mut raw_config = load_from_path(path)?;

    if let Some(dir) = raw_config.tracker.directory.take() {
        raw_config.tracker.directory = Some(resolve_relative(path, dir));
    }

    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `path` if given, otherwise the default config if it exists,
/// otherwise fall back to built-in defaults.
///
/// An explicitly requested file that is missing is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = path {
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!(path = ?default_path, "loading default config file");
        return load_and_validate(&default_path);
    }

    debug!("no config file found; using defaults");
    Ok(ConfigFile::default())
}

/// Default config location: `Branchwatch.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Branchwatch.toml")
}

fn resolve_relative(config_path: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() || dir.as_os_str().is_empty() {
        return dir;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir),
        _ => dir,
    }
}
