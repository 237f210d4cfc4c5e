// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::ResolutionOrdering;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [tracker]
/// directory = "../my-repo"
/// watch = true
/// ordering = "latest"
/// ```
///
/// All keys are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Tracker behaviour from `[tracker]`.
    #[serde(default)]
    pub tracker: TrackerSection,
}

/// `[tracker]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerSection {
    /// Directory to track. Relative paths are resolved against the
    /// directory containing the config file.
    ///
    /// If `None`, the host falls back to the current working directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Watch `.git/logs/HEAD` and refresh the label on change.
    #[serde(default = "default_watch")]
    pub watch: bool,

    /// `"completion"` (default) or `"latest"`.
    #[serde(default)]
    pub ordering: ResolutionOrdering,
}

fn default_watch() -> bool {
    true
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            directory: None,
            watch: default_watch(),
            ordering: ResolutionOrdering::default(),
        }
    }
}

/// Validated configuration.
///
/// Construct through `ConfigFile::try_from(RawConfigFile)` or the loader.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    tracker: TrackerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(tracker: TrackerSection) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &TrackerSection {
        &self.tracker
    }

    pub fn directory(&self) -> Option<&Path> {
        self.tracker.directory.as_deref()
    }

    pub fn watch(&self) -> bool {
        self.tracker.watch
    }

    pub fn ordering(&self) -> ResolutionOrdering {
        self.tracker.ordering
    }
}
