// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! First-tick and steady-state cycle specs.

use crate::prelude::*;

#[test]
fn first_tick_with_empty_mission_creates_state() {
    let device = TestDevice::new();

    let (code, payload) = device.tick();

    assert_eq!(code, 0);
    assert_eq!(payload["ok"], true);
    let result = &payload["result"];
    assert_eq!(result["day"], 1);
    assert_eq!(result["status"], "ACTIVE");
    assert_eq!(result["skipped"], false);
    assert_eq!(result["device_id"], DEVICE_ID);

    let state = device.state();
    assert_eq!(state["day"], 1);
    assert_eq!(state["status"], "ACTIVE");
    assert_eq!(state["purpose"]["becoming"], "");

    let types = device.event_types();
    assert!(types.contains(&"STATE_INITIALIZED".to_string()));
    assert!(types.contains(&"CYCLE_STARTED".to_string()));
    assert!(types.contains(&"MISSION_UNKNOWN".to_string()));
    assert!(types.contains(&"CYCLE_COMPLETED".to_string()));

    let order = device.last_work_order().unwrap();
    assert!(order["objective"]
        .as_str()
        .unwrap()
        .starts_with("Mission is currently unknown"));
}

#[test]
fn day_counter_is_monotonic_across_ticks() {
    let device = TestDevice::new();

    device.tick();
    let (_, payload) = device.tick();

    assert_eq!(payload["result"]["day"], 2);
    assert_eq!(device.state()["day"], 2);
}

#[test]
fn known_mission_switches_to_roadmap_objective() {
    let device = TestDevice::new();
    device.write_mission("## Mission\n- Keep the greenhouse alive.\n");

    device.tick();

    let order = device.last_work_order().unwrap();
    assert!(order["objective"]
        .as_str()
        .unwrap()
        .starts_with("Translate mission and current state"));
    assert!(!device.event_types().contains(&"MISSION_UNKNOWN".to_string()));

    // The public snapshot picks the mission line as purpose.
    let status: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(device.device_dir().join("public/status.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(status["purpose"], "Keep the greenhouse alive.");
}

#[test]
fn public_artifacts_are_written_each_cycle() {
    let device = TestDevice::new();

    let (_, payload) = device.tick();

    let public_status = device.device_dir().join("public/status.json");
    assert!(public_status.exists());

    let daily_dir = device.device_dir().join("public/daily");
    let daily_files: Vec<_> = std::fs::read_dir(daily_dir).unwrap().collect();
    assert_eq!(daily_files.len(), 1);

    let session_path = payload["result"]["session_path"].as_str().unwrap();
    assert!(std::path::Path::new(session_path).exists());
}

#[test]
fn events_log_only_grows() {
    let device = TestDevice::new();

    device.tick();
    let first = device.events().len();
    device.tick();
    let second = device.events().len();

    assert!(second > first);
}

#[test]
fn every_event_line_has_ts_and_type() {
    let device = TestDevice::new();
    device.tick();

    for event in device.events() {
        assert!(event["ts"].as_str().is_some(), "{event}");
        assert!(event["type"].as_str().is_some(), "{event}");
    }
}
