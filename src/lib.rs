// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod resolve;
pub mod tracker;
pub mod types;
pub mod watch;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{load_or_default, resolve_tracked_directory};
use crate::exec::ShellExecutor;
use crate::resolve::resolve_label;
use crate::types::BranchLabel;

pub use crate::tracker::{BranchNameTracker, TrackerBuilder};

/// What the host prints when the label is unknown.
pub const UNKNOWN_LABEL: &str = "(unknown)";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and directory resolution
/// - the branch tracker (or a single resolution in `--once` mode)
/// - printing every label transition to stdout
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let directory = resolve_tracked_directory(args.dir.as_deref(), &cfg)?;

    if args.once {
        let label = resolve_label(&ShellExecutor::new(), &directory).await;
        print_label(&label)?;
        return Ok(());
    }

    let ordering = args.ordering.unwrap_or(cfg.ordering());
    let auto_refresh = cfg.watch() && !args.no_watch;

    let tracker = BranchNameTracker::builder(&directory)
        .ordering(ordering)
        .auto_refresh(auto_refresh)
        .start();

    let mut labels = tracker.subscribe();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = labels.changed() => {
                if changed.is_err() {
                    info!("label channel closed; exiting");
                    break;
                }
                let label = labels.borrow_and_update().clone();
                print_label(&label)?;
            }
            res = &mut shutdown => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                }
                info!("shutdown requested");
                break;
            }
        }
    }

    tracker.stop();
    Ok(())
}

/// Text shown for a label: the label itself, or [`UNKNOWN_LABEL`].
pub fn display_label(label: &BranchLabel) -> &str {
    label.as_deref().unwrap_or(UNKNOWN_LABEL)
}

/// One line per transition, flushed so pipes see it immediately.
fn print_label(label: &BranchLabel) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", display_label(label)).context("writing label to stdout")?;
    stdout.flush().context("flushing stdout")?;
    Ok(())
}
