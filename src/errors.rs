// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! The tracker itself never surfaces these to its consumer; collaborators
//! return them and the tracker turns every failure into an absent label or
//! a missing auto-refresh. They do reach the host binary for config and
//! setup problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BranchwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BranchwatchError>;
