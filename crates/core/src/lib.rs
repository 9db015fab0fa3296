// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wdib-core: domain model and contracts for the WDIB control plane

pub mod contract;
pub mod dates;
pub mod event;
pub mod hardware;
pub mod ids;
pub mod inbox;
pub mod incident;
pub mod public_status;
pub mod state;
pub mod task;
pub mod work_order;
pub mod worker_result;

pub use contract::{
    validate_state, validate_work_order, validate_worker_result, ContractValidationError,
};
pub use dates::{append_dated_note, compact_today, now_iso, parse_iso_date, today};
pub use event::{Event, GitOutcome};
pub use hardware::{Detection, DetectionKind, HardwareRequest, HardwareStatus};
pub use ids::next_dated_id;
pub use inbox::is_terminate_command;
pub use incident::{Incident, IncidentSeverity, IncidentStatus};
pub use public_status::{HardwareCounts, PublicCounts, PublicStatus, TaskCounts};
pub use state::{Artifact, DeviceState, Purpose, StateStatus};
pub use task::{Task, TaskStatus};
pub use work_order::{HardwareSummary, IncidentSummary, TaskSummary, WorkOrder, WorkOrderContext};
pub use worker_result::{
    ArtifactReport, IncidentReport, ProposedHardwareRequest, ProposedTask, TaskUpdate,
    WorkerResult, WorkerStatus,
};

/// Contract version shared by state, work orders, and worker results.
pub const SCHEMA_VERSION: &str = "1.0";
