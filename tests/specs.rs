// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specifications for the wdib CLI.
//!
//! These tests are black-box: they invoke the CLI binary with an isolated
//! `WDIB_HOME`, the worker and git skipped, and verify stdout JSON, exit
//! codes, and on-disk artifacts.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/tick.rs"]
mod tick;

#[path = "specs/hardware.rs"]
mod hardware;

#[path = "specs/planner.rs"]
mod planner;

#[path = "specs/termination.rs"]
mod termination;

#[path = "specs/message.rs"]
mod message;
