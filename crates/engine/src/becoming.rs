// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Becoming policy under mission-unknown conditions.
//!
//! While the mission file is empty the device is in discovery: early or
//! framework-flavored becoming statements are cleared from state before
//! the cycle and rejected from worker results before the reducer runs.

use crate::mission::mission_known;
use wdib_core::{DeviceState, Event, WorkerResult};

/// Days of discovery before a becoming may stick without a mission.
pub const DISCOVERY_DAY_THRESHOLD: u32 = 3;

/// Substrings that mark a becoming as framework-internal rather than
/// human/environment-oriented.
const FRAMEWORK_MARKERS: [&str; 12] = [
    "wdib",
    "control plane",
    "control-plane",
    "control loop",
    "worker_result",
    "work order",
    "schema",
    "autonomous",
    "orchestrat",
    "framework",
    "reducer",
    "event log",
];

fn looks_framework_internal(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FRAMEWORK_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Pre-cycle: drop a premature or framework-flavored becoming from state.
pub fn clear_framework_becoming(state: &mut DeviceState, mission_text: &str) -> Option<Event> {
    if mission_known(mission_text) {
        return None;
    }
    let becoming = state.purpose.becoming.trim().to_string();
    if becoming.is_empty() {
        return None;
    }

    let reason = if looks_framework_internal(&becoming) {
        "Mission is unknown and the stored becoming is framework-internal."
    } else if state.day < DISCOVERY_DAY_THRESHOLD {
        "Mission is unknown and the discovery window has not passed."
    } else {
        return None;
    };

    state.purpose.becoming = String::new();
    Some(Event::BecomingCleared {
        previous: becoming,
        reason: reason.to_string(),
    })
}

/// Post-worker: reject a proposed becoming before the reducer sees it.
pub fn reject_worker_becoming(
    result: &mut WorkerResult,
    mission_text: &str,
    day: u32,
) -> Option<Event> {
    if mission_known(mission_text) {
        return None;
    }
    let proposed = result.becoming.as_deref().map(str::trim)?.to_string();
    if proposed.is_empty() {
        result.becoming = None;
        return None;
    }

    let reason = if looks_framework_internal(&proposed) {
        "Mission is unknown and the proposed becoming is framework-internal."
    } else if day < DISCOVERY_DAY_THRESHOLD {
        "Mission is unknown and the discovery window has not passed."
    } else {
        return None;
    };

    result.becoming = None;
    Some(Event::BecomingRejected {
        proposed,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
#[path = "becoming_tests.rs"]
mod tests;
