// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Planner selection, rotation, and deferral specs.

use crate::prelude::*;
use serde_json::json;

#[test]
fn saturated_streak_rotates_to_first_todo() {
    let device = TestDevice::new();

    let mut state = base_state();
    state["tasks"] = json!([
        task_json("task-20260224-001", "long running refactor", "IN_PROGRESS", 2),
        task_json("task-20260224-002", "write probe script", "TODO", 0),
    ]);
    device.seed_state(&state);

    device.tick();

    let types = device.event_types();
    assert!(types.contains(&"TASK_PLANNER_ROTATED".to_string()));
    assert!(types.contains(&"TASK_STATUS_CHANGED".to_string()));

    let state = device.state();
    // The rotated task keeps IN_PROGRESS but its streak resets.
    assert_eq!(state["tasks"][0]["status"], "IN_PROGRESS");
    assert_eq!(state["tasks"][0]["selection_streak"], 0);
    // The promoted task is now selected.
    assert_eq!(state["tasks"][1]["status"], "IN_PROGRESS");
    assert_eq!(state["tasks"][1]["selection_streak"], 1);

    let order = device.last_work_order().unwrap();
    assert!(order["objective"]
        .as_str()
        .unwrap()
        .starts_with("Advance task task-20260224-002"));
}

#[test]
fn selected_task_streak_increments_and_others_reset() {
    let device = TestDevice::new();

    let mut state = base_state();
    state["tasks"] = json!([
        task_json("task-20260224-001", "active work", "IN_PROGRESS", 1),
        task_json("task-20260224-002", "stale counter", "TODO", 4),
    ]);
    device.seed_state(&state);

    device.tick();

    let state = device.state();
    assert_eq!(state["tasks"][0]["selection_streak"], 2);
    assert_eq!(state["tasks"][1]["selection_streak"], 0);
}

#[test]
fn expired_deferral_is_released_on_plan() {
    let device = TestDevice::new();

    let mut deferred = task_json("task-20260224-001", "resume me", "TODO", 0);
    deferred["defer_until"] = json!(yesterday());
    deferred["defer_reason"] = json!("waiting on delivery");
    let mut state = base_state();
    state["tasks"] = json!([deferred]);
    device.seed_state(&state);

    device.tick();

    assert!(device
        .event_types()
        .contains(&"TASK_DEFER_RELEASED".to_string()));

    let state = device.state();
    assert_eq!(state["tasks"][0]["defer_until"], serde_json::Value::Null);
    assert_eq!(state["tasks"][0]["defer_reason"], "");
    // Released task became eligible and was promoted this very tick.
    assert_eq!(state["tasks"][0]["status"], "IN_PROGRESS");
}

#[test]
fn invalid_defer_date_is_cleared_with_event() {
    let device = TestDevice::new();

    let mut broken = task_json("task-20260224-001", "broken date", "TODO", 0);
    broken["defer_until"] = json!("soonish");
    let mut state = base_state();
    state["tasks"] = json!([broken]);
    device.seed_state(&state);

    device.tick();

    assert!(device
        .event_types()
        .contains(&"TASK_DEFER_INVALID".to_string()));
    assert_eq!(device.state()["tasks"][0]["defer_until"], serde_json::Value::Null);
}
