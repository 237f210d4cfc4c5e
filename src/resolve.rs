// src/resolve.rs

//! Branch label resolution.
//!
//! Asks git for the abbreviated symbolic ref of `HEAD`, falling back to the
//! short commit hash when the repository is in detached state. The command
//! strings are fixed; scripted environments match on them verbatim.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::exec::ProcessExecutor;
use crate::types::BranchLabel;

/// Query for the current branch name.
pub const ABBREV_REF_COMMAND: &str = "git rev-parse --abbrev-ref HEAD";

/// Query for the short hash of `HEAD`, used in detached state.
pub const SHORT_HASH_COMMAND: &str = "git rev-parse --short HEAD";

/// What git prints for the abbreviated ref when no branch is checked out.
pub const DETACHED_HEAD: &str = "HEAD";

/// Path of the reflog whose modification accompanies every branch switch
/// or commit in `directory`.
pub fn head_log_path(directory: &Path) -> PathBuf {
    directory.join(".git").join("logs").join("HEAD")
}

/// Resolve the label for `directory`.
///
/// Never fails: a failed query (not a repository, git missing, non-zero
/// exit) yields `None`, as does empty output.
pub async fn resolve_label(executor: &dyn ProcessExecutor, directory: &Path) -> BranchLabel {
    let output = match executor.run(ABBREV_REF_COMMAND, directory).await {
        Ok(out) => out,
        Err(err) => {
            debug!(dir = ?directory, error = %err, "branch query failed");
            return None;
        }
    };

    let branch = output.trim();
    if branch != DETACHED_HEAD {
        return non_empty(branch);
    }

    debug!(dir = ?directory, "detached HEAD; resolving short hash");

    match executor.run(SHORT_HASH_COMMAND, directory).await {
        Ok(out) => non_empty(out.trim()),
        Err(err) => {
            debug!(dir = ?directory, error = %err, "short hash query failed");
            None
        }
    }
}

fn non_empty(s: &str) -> BranchLabel {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
