// src/exec/backend.rs

//! Pluggable process executor abstraction.
//!
//! The tracker talks to a `ProcessExecutor` instead of spawning processes
//! itself. This makes it easy to swap in a scripted executor in tests while
//! keeping the production implementation in [`shell`](super::shell).

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;

use super::shell::run_command;

/// Trait abstracting how a single external command is run.
///
/// Production code uses [`ShellExecutor`]; tests can provide their own
/// implementation that returns canned output without spawning anything.
pub trait ProcessExecutor: Send + Sync {
    /// Run `command` with `cwd` as working directory and resolve to its
    /// stdout. Any failure (spawn error, non-zero exit) is an `Err`.
    fn run<'a>(
        &'a self,
        command: &'a str,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Real executor used in production: runs the command through the
/// platform shell with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessExecutor for ShellExecutor {
    fn run<'a>(
        &'a self,
        command: &'a str,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(run_command(command, cwd))
    }
}
