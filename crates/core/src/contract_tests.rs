// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::state::DeviceState;
use crate::worker_result::{WorkerResult, WorkerStatus};

#[test]
fn default_state_template_is_schema_valid() {
    let state = DeviceState::new("11111111-2222-4333-8444-555555555555", "MISSION.md");
    let value = serde_json::to_value(&state).unwrap();
    validate_state(&value).unwrap();
}

#[test]
fn state_with_wrong_status_fails() {
    let state = DeviceState::new("dev", "MISSION.md");
    let mut value = serde_json::to_value(&state).unwrap();
    value["status"] = serde_json::json!("SLEEPING");

    let err = validate_state(&value).unwrap_err();
    assert_eq!(err.label, "state");
    assert!(err.detail.contains("status"), "{}", err.detail);
}

#[test]
fn missing_required_key_reports_root_location() {
    let mut value = serde_json::to_value(DeviceState::new("dev", "MISSION.md")).unwrap();
    value.as_object_mut().unwrap().remove("device_id");

    let err = validate_state(&value).unwrap_err();
    assert!(err.detail.contains("<root>"), "{}", err.detail);
    assert!(err.detail.contains("device_id"), "{}", err.detail);
}

#[test]
fn error_detail_is_capped_at_ten_problems() {
    // An array of 20 invalid tasks produces well over ten violations.
    let mut state = serde_json::to_value(DeviceState::new("dev", "MISSION.md")).unwrap();
    let broken_tasks: Vec<_> = (0..20).map(|_| serde_json::json!({})).collect();
    state["tasks"] = serde_json::json!(broken_tasks);

    let err = validate_state(&state).unwrap_err();
    assert!(err.detail.matches("; ").count() < 10, "{}", err.detail);
}

#[test]
fn bare_worker_result_is_valid() {
    let result = WorkerResult::bare("cycle-001-20260101T000000", WorkerStatus::Blocked, "skip");
    let value = serde_json::to_value(&result).unwrap();
    validate_worker_result(&value).unwrap();
}

#[test]
fn empty_cycle_id_is_rejected() {
    let result = WorkerResult::bare("", WorkerStatus::Completed, "ok");
    let value = serde_json::to_value(&result).unwrap();
    let err = validate_worker_result(&value).unwrap_err();
    assert!(err.detail.contains("cycle_id"), "{}", err.detail);
}

#[test]
fn worker_result_with_unknown_status_string_fails() {
    let value = serde_json::json!({
        "schema_version": "1.0",
        "cycle_id": "cycle-001-20260101T000000",
        "status": "SUCCESS",
        "summary": "legacy status spelling"
    });
    assert!(validate_worker_result(&value).is_err());
}
