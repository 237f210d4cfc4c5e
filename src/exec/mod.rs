// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the git queries the tracker issues, using
//! `tokio::process::Command`.
//!
//! - [`shell`] spawns one command through the platform shell and collects
//!   its stdout.
//! - [`backend`] provides the `ProcessExecutor` trait and the concrete
//!   `ShellExecutor` used in production, which tests can replace with a
//!   scripted implementation.

pub mod backend;
pub mod shell;

pub use backend::{ProcessExecutor, ShellExecutor};
pub use shell::run_command;
