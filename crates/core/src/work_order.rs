// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work-order contract handed to the external worker.

use crate::hardware::HardwareStatus;
use crate::incident::IncidentStatus;
use crate::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// Compact task view included in the worker context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub defer_until: String,
}

/// Compact hardware-request view included in the worker context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareSummary {
    pub id: String,
    pub name: String,
    pub status: HardwareStatus,
}

/// Compact incident view included in the worker context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub id: String,
    pub title: String,
    pub status: IncidentStatus,
}

/// Context the worker plans against. Lists are capped by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderContext {
    pub becoming: String,
    pub mission_excerpt: String,
    pub tasks: Vec<TaskSummary>,
    pub hardware_requests: Vec<HardwareSummary>,
    pub incidents: Vec<IncidentSummary>,
}

/// Schema-validated order describing one cycle's objective for the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub schema_version: String,
    pub cycle_id: String,
    pub created_on: String,
    pub device_id: String,
    pub objective: String,
    pub constraints: Vec<String>,
    pub allowed_paths: Vec<String>,
    pub context: WorkOrderContext,
    /// Where the worker must write its result JSON.
    pub result_path: String,
    pub result_schema_version: String,
}
