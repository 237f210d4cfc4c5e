use std::str::FromStr;
use serde::Deserialize;

/// The label shown for the tracked directory.
///
/// `Some(name)` is either a branch name or, in detached state, a short
/// commit id. `None` means unknown: nothing resolved yet, or the last
/// resolution failed.
pub type BranchLabel = Option<String>;

/// Signal from a file watcher that the watched path changed.
///
/// Carries no payload; any change kind re-triggers label resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchEvent;

/// How completions of overlapping resolutions are applied.
///
/// - `Completion`: every completion is applied as it arrives, so a slower
///   earlier resolution can overwrite a faster later one until the next
///   change event (default behaviour).
/// - `Latest`: each resolution gets a sequence number and a completion is
///   applied only if it is newer than the last applied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOrdering {
    Completion,
    Latest,
}

impl Default for ResolutionOrdering {
    fn default() -> Self {
        ResolutionOrdering::Completion
    }
}

impl FromStr for ResolutionOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completion" => Ok(ResolutionOrdering::Completion),
            "latest" => Ok(ResolutionOrdering::Latest),
            other => Err(format!(
                "invalid ordering: {other} (expected \"completion\" or \"latest\")"
            )),
        }
    }
}
