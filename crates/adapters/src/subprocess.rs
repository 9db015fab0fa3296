// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers.
//!
//! Shell-style probes go through the [`CommandRunner`] trait so the
//! hardware reconciler can be driven by a deterministic fake in tests.

use async_trait::async_trait;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for git operations.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of running one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Combined stdout/stderr, trimmed.
    pub output: String,
    pub timed_out: bool,
}

impl CommandOutcome {
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            success: false,
            output: format!("timeout after {}s", timeout.as_secs()),
            timed_out: true,
        }
    }
}

/// Narrow interface for running shell commands with a wall-clock timeout.
#[async_trait]
pub trait CommandRunner: Clone + Send + Sync + 'static {
    async fn run(&self, command: &str, timeout: Duration) -> CommandOutcome;
}

/// Production runner: `sh -c <command>` under a tokio timeout.
#[derive(Clone, Default)]
pub struct OsCommandRunner;

#[async_trait]
impl CommandRunner for OsCommandRunner {
    async fn run(&self, command: &str, timeout: Duration) -> CommandOutcome {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(io_err)) => {
                return CommandOutcome {
                    success: false,
                    output: io_err.to_string(),
                    timed_out: false,
                }
            }
            Err(_elapsed) => return CommandOutcome::timeout(timeout),
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !combined.trim().is_empty() {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }

        CommandOutcome {
            success: output.status.success(),
            output: combined.trim().to_string(),
            timed_out: false,
        }
    }
}

/// Run an argv-style command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting
/// timeout expiration into a descriptive error message. The child process
/// is killed automatically if the timeout elapses.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Err(format!(
            "{} timed out after {}s",
            description,
            timeout.as_secs()
        )),
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{CommandOutcome, CommandRunner};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    /// Deterministic runner for tests: scripted responses plus a call log.
    #[derive(Clone, Default)]
    pub struct FakeCommandRunner {
        responses: Arc<Mutex<HashMap<String, CommandOutcome>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the outcome for an exact command string.
        pub fn respond(&self, command: &str, success: bool, output: &str) {
            self.responses.lock().insert(
                command.to_string(),
                CommandOutcome {
                    success,
                    output: output.to_string(),
                    timed_out: false,
                },
            );
        }

        /// Script a timeout for an exact command string.
        pub fn respond_timeout(&self, command: &str) {
            self.responses.lock().insert(
                command.to_string(),
                CommandOutcome::timeout(Duration::from_secs(0)),
            );
        }

        /// Commands run so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeCommandRunner {
        async fn run(&self, command: &str, _timeout: Duration) -> CommandOutcome {
            self.calls.lock().push(command.to_string());
            self.responses
                .lock()
                .get(command)
                .cloned()
                .unwrap_or(CommandOutcome {
                    success: false,
                    output: format!("no scripted response for: {command}"),
                    timed_out: false,
                })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCommandRunner;

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
