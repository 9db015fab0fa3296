// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hardware request records and the detection/verification state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a hardware request.
///
/// `OPEN → DETECTED → VERIFIED` with fallback to `OPEN` when the detection
/// signal disappears. `FAILED` is terminal and only ever set externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HardwareStatus {
    Open,
    Detected,
    Verified,
    Failed,
}

impl HardwareStatus {
    /// Requests in these states still need machine-observed signals.
    pub fn is_unresolved(self) -> bool {
        matches!(self, HardwareStatus::Open | HardwareStatus::Detected)
    }
}

impl fmt::Display for HardwareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareStatus::Open => write!(f, "OPEN"),
            HardwareStatus::Detected => write!(f, "DETECTED"),
            HardwareStatus::Verified => write!(f, "VERIFIED"),
            HardwareStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// How presence of a hardware signal is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    PathExists,
    GlobExists,
    CommandSuccess,
    LsusbContains,
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionKind::PathExists => write!(f, "path_exists"),
            DetectionKind::GlobExists => write!(f, "glob_exists"),
            DetectionKind::CommandSuccess => write!(f, "command_success"),
            DetectionKind::LsusbContains => write!(f, "lsusb_contains"),
        }
    }
}

/// Machine-checkable presence signal for a hardware request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: DetectionKind,
    pub value: String,
}

/// A request for physical hardware, advanced only by observed signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareRequest {
    pub id: String,
    pub name: String,
    pub reason: String,
    pub status: HardwareStatus,
    pub detection: Detection,
    /// Shell command that must succeed for the request to reach VERIFIED.
    /// Empty means detection alone verifies.
    #[serde(default)]
    pub verify_command: String,
    pub requested_on: String,
    #[serde(default)]
    pub last_checked_on: Option<String>,
    #[serde(default)]
    pub detected_on: Option<String>,
    #[serde(default)]
    pub verified_on: Option<String>,
    #[serde(default)]
    pub verify_failures: u32,
    #[serde(default)]
    pub notes: String,
}

impl HardwareRequest {
    /// Create a new OPEN request dated today.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
        detection: Detection,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reason: reason.into(),
            status: HardwareStatus::Open,
            detection,
            verify_command: String::new(),
            requested_on: crate::dates::today(),
            last_checked_on: None,
            detected_on: None,
            verified_on: None,
            verify_failures: 0,
            notes: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "hardware_tests.rs"]
mod tests;
