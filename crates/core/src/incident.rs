// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incident records for reliability problems surfaced during cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Open,
    Resolved,
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "OPEN"),
            IncidentStatus::Resolved => write!(f, "RESOLVED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncidentSeverity::Low => write!(f, "LOW"),
            IncidentSeverity::Medium => write!(f, "MEDIUM"),
            IncidentSeverity::High => write!(f, "HIGH"),
        }
    }
}

/// A recorded reliability problem. IDs follow `incident-YYYYMMDD-NNN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub status: IncidentStatus,
    pub severity: IncidentSeverity,
    pub summary: String,
    pub created_on: String,
    pub updated_on: String,
}

impl Incident {
    /// Create an OPEN incident dated today.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        severity: IncidentSeverity,
        summary: impl Into<String>,
    ) -> Self {
        let today = crate::dates::today();
        Self {
            id: id.into(),
            title: title.into(),
            status: IncidentStatus::Open,
            severity,
            summary: summary.into(),
            created_on: today.clone(),
            updated_on: today,
        }
    }
}
