// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task records and their status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Done => write!(f, "DONE"),
            TaskStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// A unit of work tracked across cycles.
///
/// IDs follow `task-YYYYMMDD-NNN` and are unique within the device state.
/// A `DONE` task always has `completed_on` set, no deferral, and a zero
/// selection streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub blocked_by: String,
    pub created_on: String,
    pub updated_on: String,
    #[serde(default)]
    pub completed_on: Option<String>,
    /// Task is held back from planning until this date passes.
    #[serde(default)]
    pub defer_until: Option<String>,
    #[serde(default)]
    pub defer_reason: String,
    /// Consecutive planner selections; rotation fires when this saturates.
    #[serde(default)]
    pub selection_streak: u32,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    /// Create a fresh task with today's dates and defaults.
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: TaskStatus) -> Self {
        let today = crate::dates::today();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status,
            blocked_by: String::new(),
            created_on: today.clone(),
            updated_on: today.clone(),
            completed_on: (status == TaskStatus::Done).then_some(today),
            defer_until: None,
            defer_reason: String::new(),
            selection_streak: 0,
            notes: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
