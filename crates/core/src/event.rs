// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types appended to the per-device NDJSON log.
//!
//! Serializes with `{"type": "EVENT_NAME", ...fields}` format. The storage
//! layer stamps `ts` (and `cycle_id` where one is active) around this enum
//! when writing a log line.

use crate::hardware::HardwareStatus;
use crate::incident::IncidentSeverity;
use crate::state::StateStatus;
use crate::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// Outcome of the git publication step, embedded in `CYCLE_COMPLETED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitOutcome {
    pub committed: bool,
    pub pushed: bool,
    pub message: String,
}

impl GitOutcome {
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            committed: false,
            pushed: false,
            message: message.into(),
        }
    }
}

/// Events recorded during orchestration cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- cycle --
    #[serde(rename = "CYCLE_STARTED")]
    CycleStarted { day: u32, status: StateStatus },

    #[serde(rename = "CYCLE_COMPLETED")]
    CycleCompleted {
        day: u32,
        status: StateStatus,
        git: GitOutcome,
    },

    #[serde(rename = "CYCLE_FAILED")]
    CycleFailed { day: u32, error: String },

    // -- hardware --
    #[serde(rename = "HARDWARE_STATUS_CHANGED")]
    HardwareStatusChanged {
        request_id: String,
        from: HardwareStatus,
        to: HardwareStatus,
        evidence: String,
    },

    #[serde(rename = "HARDWARE_VERIFICATION_FAILED")]
    HardwareVerificationFailed {
        request_id: String,
        verify_failures: u32,
        evidence: String,
    },

    #[serde(rename = "HARDWARE_REQUEST_CREATED")]
    HardwareRequestCreated { request_id: String, name: String },

    // -- tasks --
    #[serde(rename = "TASK_STATUS_CHANGED")]
    TaskStatusChanged {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
        reason: String,
    },

    #[serde(rename = "TASK_CREATED")]
    TaskCreated { task_id: String, title: String },

    #[serde(rename = "TASK_PLANNER_ROTATED")]
    TaskPlannerRotated {
        from_task_id: String,
        to_task_id: String,
        reason: String,
    },

    #[serde(rename = "TASK_DEFER_SET")]
    TaskDeferSet { task_id: String, defer_until: String },

    #[serde(rename = "TASK_DEFER_RELEASED")]
    TaskDeferReleased {
        task_id: String,
        defer_until: String,
        reason: String,
    },

    #[serde(rename = "TASK_DEFER_CLEARED")]
    TaskDeferCleared { task_id: String, reason: String },

    #[serde(rename = "TASK_DEFER_INVALID")]
    TaskDeferInvalid {
        task_id: String,
        value: String,
        reason: String,
    },

    // -- incidents --
    #[serde(rename = "INCIDENT_CREATED")]
    IncidentCreated {
        incident_id: String,
        title: String,
        severity: IncidentSeverity,
    },

    // -- becoming --
    #[serde(rename = "BECOMING_UPDATED")]
    BecomingUpdated { from: String, to: String },

    #[serde(rename = "BECOMING_CLEARED")]
    BecomingCleared { previous: String, reason: String },

    #[serde(rename = "BECOMING_REJECTED")]
    BecomingRejected { proposed: String, reason: String },

    // -- worker --
    #[serde(rename = "WORKER_EXECUTED")]
    WorkerExecuted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        returncode: Option<i32>,
        mode: String,
    },

    // -- human --
    #[serde(rename = "HUMAN_MESSAGE_RECEIVED")]
    HumanMessageReceived { preview: String },

    #[serde(rename = "HUMAN_COMMAND_TERMINATE")]
    HumanCommandTerminate { preview: String },

    // -- notifications --
    #[serde(rename = "NOTIFICATION_SENT")]
    NotificationSent { channel: String },

    #[serde(rename = "NOTIFICATION_FAILED")]
    NotificationFailed { channel: String, reason: String },

    // -- state --
    #[serde(rename = "STATE_INITIALIZED")]
    StateInitialized { message: String },

    #[serde(rename = "STATE_MIGRATED")]
    StateMigrated { changes: Vec<String> },

    #[serde(rename = "MISSION_UNKNOWN")]
    MissionUnknown { reason: String },
}

impl Event {
    /// Wire name of the event's type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::CycleStarted { .. } => "CYCLE_STARTED",
            Event::CycleCompleted { .. } => "CYCLE_COMPLETED",
            Event::CycleFailed { .. } => "CYCLE_FAILED",
            Event::HardwareStatusChanged { .. } => "HARDWARE_STATUS_CHANGED",
            Event::HardwareVerificationFailed { .. } => "HARDWARE_VERIFICATION_FAILED",
            Event::HardwareRequestCreated { .. } => "HARDWARE_REQUEST_CREATED",
            Event::TaskStatusChanged { .. } => "TASK_STATUS_CHANGED",
            Event::TaskCreated { .. } => "TASK_CREATED",
            Event::TaskPlannerRotated { .. } => "TASK_PLANNER_ROTATED",
            Event::TaskDeferSet { .. } => "TASK_DEFER_SET",
            Event::TaskDeferReleased { .. } => "TASK_DEFER_RELEASED",
            Event::TaskDeferCleared { .. } => "TASK_DEFER_CLEARED",
            Event::TaskDeferInvalid { .. } => "TASK_DEFER_INVALID",
            Event::IncidentCreated { .. } => "INCIDENT_CREATED",
            Event::BecomingUpdated { .. } => "BECOMING_UPDATED",
            Event::BecomingCleared { .. } => "BECOMING_CLEARED",
            Event::BecomingRejected { .. } => "BECOMING_REJECTED",
            Event::WorkerExecuted { .. } => "WORKER_EXECUTED",
            Event::HumanMessageReceived { .. } => "HUMAN_MESSAGE_RECEIVED",
            Event::HumanCommandTerminate { .. } => "HUMAN_COMMAND_TERMINATE",
            Event::NotificationSent { .. } => "NOTIFICATION_SENT",
            Event::NotificationFailed { .. } => "NOTIFICATION_FAILED",
            Event::StateInitialized { .. } => "STATE_INITIALIZED",
            Event::StateMigrated { .. } => "STATE_MIGRATED",
            Event::MissionUnknown { .. } => "MISSION_UNKNOWN",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
