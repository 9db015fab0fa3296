// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-result contract returned by the external worker.
//!
//! These types represent the *normalized* payload: the worker adapter maps
//! legacy field and status spellings onto this shape before validation, so
//! the reducer only ever sees canonical values.

use crate::hardware::Detection;
use crate::incident::{IncidentSeverity, IncidentStatus};
use crate::task::TaskStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Worker-reported outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStatus {
    Completed,
    Blocked,
    Failed,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Completed => write!(f, "COMPLETED"),
            WorkerStatus::Blocked => write!(f, "BLOCKED"),
            WorkerStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// A new task proposed by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub blocked_by: String,
    #[serde(default)]
    pub notes: String,
}

// Distinguishes an absent key from an explicit null: the outer Option is
// None only when the key is missing entirely.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A mutation of an existing task.
///
/// `defer_until` uses key-presence semantics: a missing key leaves the
/// deferral untouched, while `null` or `""` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub defer_until: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub defer_reason: Option<Option<String>>,
    #[serde(default)]
    pub note: String,
}

/// A new hardware request proposed by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedHardwareRequest {
    pub name: String,
    pub reason: String,
    pub detection: Detection,
    #[serde(default)]
    pub verify_command: String,
    #[serde(default)]
    pub notes: String,
}

/// An incident reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub title: String,
    pub summary: String,
    #[serde(default = "IncidentReport::default_severity")]
    pub severity: IncidentSeverity,
    #[serde(default = "IncidentReport::default_status")]
    pub status: IncidentStatus,
}

impl IncidentReport {
    fn default_severity() -> IncidentSeverity {
        IncidentSeverity::Medium
    }

    fn default_status() -> IncidentStatus {
        IncidentStatus::Open
    }
}

/// An artifact reported by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub path: String,
    pub description: String,
}

/// Normalized, schema-validated result of one worker run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub schema_version: String,
    pub cycle_id: String,
    pub status: WorkerStatus,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub becoming: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proposed_tasks: Vec<ProposedTask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_updates: Vec<TaskUpdate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proposed_hardware_requests: Vec<ProposedHardwareRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incidents: Vec<IncidentReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactReport>,
}

impl WorkerResult {
    /// Minimal result with no proposed mutations.
    pub fn bare(cycle_id: impl Into<String>, status: WorkerStatus, summary: impl Into<String>) -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            cycle_id: cycle_id.into(),
            status,
            summary: summary.into(),
            becoming: None,
            proposed_tasks: Vec::new(),
            task_updates: Vec::new(),
            proposed_hardware_requests: Vec::new(),
            incidents: Vec::new(),
            artifacts: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "worker_result_tests.rs"]
mod tests;
