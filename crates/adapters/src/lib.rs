// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wdib-adapters: external collaborators behind narrow interfaces.
//!
//! Everything that leaves the process lives here: the codex worker
//! subprocess, the git binary, notification channels, and shell commands
//! run by the hardware reconciler.

pub mod env;
pub mod extract;
pub mod git;
pub mod notify;
pub mod subprocess;
pub mod worker;

pub use extract::extract_json_object;
pub use git::commit_device_changes;
pub use notify::{
    ChannelOutcome, CycleContext, FailureContext, NotificationRouter, NotifyError, NotifyProvider,
};
pub use subprocess::{CommandOutcome, CommandRunner, OsCommandRunner};
pub use worker::{execute_work_order, SandboxMode, WorkerRunFailure, WorkerRunMetadata};

#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyProvider;
#[cfg(any(test, feature = "test-support"))]
pub use subprocess::FakeCommandRunner;
