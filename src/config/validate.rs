// src/config/validate.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BranchwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BranchwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.tracker))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    // `ordering` is strongly typed and validated during deserialization.
    if let Some(dir) = &cfg.tracker.directory {
        if dir.as_os_str().is_empty() {
            return Err(BranchwatchError::ConfigError(
                "[tracker].directory must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Pick the directory to track and turn it into a canonical absolute path.
///
/// Priority: `cli_dir`, then `[tracker].directory`, then the current
/// working directory. The result must exist and be a directory.
pub fn resolve_tracked_directory(cli_dir: Option<&Path>, cfg: &ConfigFile) -> Result<PathBuf> {
    let chosen = match cli_dir.or(cfg.directory()) {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let canonical = chosen.canonicalize().map_err(|err| {
        BranchwatchError::ConfigError(format!("cannot resolve directory {:?}: {err}", chosen))
    })?;

    if !canonical.is_dir() {
        return Err(BranchwatchError::ConfigError(format!(
            "{:?} is not a directory",
            canonical
        )));
    }

    Ok(canonical)
}
