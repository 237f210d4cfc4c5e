use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use branchwatch::errors::{BranchwatchError, Result};
use branchwatch::exec::ProcessExecutor;

use crate::Gate;

#[derive(Debug, Clone)]
struct Reply {
    output: std::result::Result<String, String>,
    gate: Option<Gate>,
}

/// A scripted process executor that:
/// - records every command it is asked to run (and where)
/// - answers from one-shot replies first, then from sticky replies
/// - fails any command it has no reply for, like a missing tool would.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    once: Mutex<HashMap<String, VecDeque<Reply>>>,
    sticky: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every future run of `command` with `stdout`.
    pub fn succeed(&self, command: &str, stdout: &str) {
        self.set_sticky(command, Ok(stdout.to_string()));
    }

    /// Make every future run of `command` fail.
    pub fn fail(&self, command: &str) {
        self.set_sticky(command, Err(format!("fatal: scripted failure for `{command}`")));
    }

    /// Answer the next run of `command` with `stdout`, ahead of sticky replies.
    pub fn succeed_once(&self, command: &str, stdout: &str) {
        self.push_once(command, Ok(stdout.to_string()), None);
    }

    /// Like [`succeed_once`](Self::succeed_once), but the run only completes
    /// once the returned gate is opened.
    pub fn succeed_once_gated(&self, command: &str, stdout: &str) -> Gate {
        let gate = Gate::new();
        self.push_once(command, Ok(stdout.to_string()), Some(gate.clone()));
        gate
    }

    /// Commands run so far, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Working directories used so far, in call order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(_, d)| d.clone()).collect()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .count()
    }

    fn set_sticky(&self, command: &str, output: std::result::Result<String, String>) {
        self.sticky
            .lock()
            .unwrap()
            .insert(command.to_string(), Reply { output, gate: None });
    }

    fn push_once(
        &self,
        command: &str,
        output: std::result::Result<String, String>,
        gate: Option<Gate>,
    ) {
        self.once
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(Reply { output, gate });
    }

    fn next_reply(&self, command: &str) -> Reply {
        if let Some(reply) = self
            .once
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(|queue| queue.pop_front())
        {
            return reply;
        }

        self.sticky
            .lock()
            .unwrap()
            .get(command)
            .cloned()
            .unwrap_or_else(|| Reply {
                output: Err(format!("sh: unscripted command `{command}`")),
                gate: None,
            })
    }
}

impl ProcessExecutor for FakeExecutor {
    fn run<'a>(
        &'a self,
        command: &'a str,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));
        let reply = self.next_reply(command);

        Box::pin(async move {
            if let Some(gate) = reply.gate {
                gate.wait().await;
            }

            reply.output.map_err(|stderr| BranchwatchError::Command {
                command: command.to_string(),
                code: 128,
                stderr,
            })
        })
    }
}
