// src/exec/shell.rs

//! One-shot shell command runner.

use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{BranchwatchError, Result};

/// Build a shell command appropriate for the platform.
///
/// Commands are passed verbatim to the shell so scripted environments that
/// intercept the exact command string keep working.
pub fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Run `command` in `cwd` and return its stdout.
///
/// A non-zero exit is reported as [`BranchwatchError::Command`] with the
/// trimmed stderr. The child is not killed if the returned future is
/// dropped; it is simply left to finish on its own.
pub async fn run_command(command: &str, cwd: &Path) -> Result<String> {
    debug!(cmd = %command, cwd = ?cwd, "running command");

    let mut cmd = shell_command(command);
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd
        .output()
        .await
        .with_context(|| format!("spawning `{command}` in {:?}", cwd))?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(cmd = %command, exit_code = code, stderr = %stderr, "command failed");
        return Err(BranchwatchError::Command {
            command: command.to_string(),
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
