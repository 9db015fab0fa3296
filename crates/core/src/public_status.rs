// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sanitized public status snapshot published each cycle.
//!
//! Everything in this DTO has already been through the publication
//! sanitizers; it is safe to push to the read-only publication layer and
//! to notification channels.

use crate::state::StateStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub blocked: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareCounts {
    pub open: usize,
    pub detected: usize,
    pub verified: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCounts {
    pub tasks: TaskCounts,
    pub hardware_requests: HardwareCounts,
    pub incidents_open: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicStatus {
    pub schema_version: String,
    pub device_id_short: String,
    pub cycle_id: String,
    pub updated_at: String,
    pub date: String,
    pub first_awoke_on: String,
    pub day: u32,
    pub status: StateStatus,
    pub worker_status: String,
    pub purpose: String,
    pub becoming: String,
    pub recent_activity: String,
    pub system_profile: String,
    pub completed_tasks: Vec<String>,
    pub next_tasks: Vec<String>,
    pub hardware_focus: Vec<String>,
    pub engineering_details: Vec<String>,
    pub self_observation: String,
    pub counts: PublicCounts,
    pub public_notice: String,
}
