// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hardware request lifecycle specs.

use crate::prelude::*;
use serde_json::json;

#[test]
fn detection_and_verification_happen_in_one_tick() {
    let device = TestDevice::new();

    let fixture_dir = device.root().join("fixtures");
    std::fs::create_dir_all(&fixture_dir).unwrap();
    std::fs::write(fixture_dir.join("video0"), "").unwrap();
    let pattern = format!("{}/video*", fixture_dir.display());

    let mut state = base_state();
    state["hardware_requests"] = json!([hardware_json(
        "hardware-20260224-001",
        "USB Camera",
        "glob_exists",
        &pattern,
        "true"
    )]);
    device.seed_state(&state);

    let (code, payload) = device.tick();
    assert_eq!(code, 0);

    let changes: Vec<(String, String)> = device
        .events()
        .iter()
        .filter(|event| event["type"] == "HARDWARE_STATUS_CHANGED")
        .map(|event| {
            (
                event["from"].as_str().unwrap().to_string(),
                event["to"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            ("OPEN".to_string(), "DETECTED".to_string()),
            ("DETECTED".to_string(), "VERIFIED".to_string()),
        ]
    );

    let state = device.state();
    assert_eq!(state["hardware_requests"][0]["status"], "VERIFIED");
    assert!(state["hardware_requests"][0]["verified_on"].is_string());
    // No unresolved hardware left, so the device is not blocked.
    assert_eq!(payload["result"]["status"], "ACTIVE");
}

#[test]
fn missing_signal_keeps_request_open_and_blocks() {
    let device = TestDevice::new();

    let mut state = base_state();
    state["hardware_requests"] = json!([hardware_json(
        "hardware-20260224-001",
        "USB Camera",
        "glob_exists",
        "/nonexistent/video*",
        ""
    )]);
    device.seed_state(&state);

    let (_, payload) = device.tick();

    let state = device.state();
    assert_eq!(state["hardware_requests"][0]["status"], "OPEN");
    assert!(state["hardware_requests"][0]["last_checked_on"].is_string());
    assert_eq!(payload["result"]["status"], "BLOCKED_HARDWARE");

    let order = device.last_work_order().unwrap();
    assert!(order["objective"]
        .as_str()
        .unwrap()
        .starts_with("Hardware requests are pending"));
}

#[test]
fn failed_verification_counts_but_does_not_poison() {
    let device = TestDevice::new();

    let fixture = device.root().join("sensor");
    std::fs::write(&fixture, "").unwrap();

    let mut state = base_state();
    state["hardware_requests"] = json!([hardware_json(
        "hardware-20260224-001",
        "Soil Sensor",
        "path_exists",
        &fixture.display().to_string(),
        "false"
    )]);
    device.seed_state(&state);

    device.tick();

    let state = device.state();
    assert_eq!(state["hardware_requests"][0]["status"], "DETECTED");
    assert_eq!(state["hardware_requests"][0]["verify_failures"], 1);
    assert!(device
        .event_types()
        .contains(&"HARDWARE_VERIFICATION_FAILED".to_string()));
}
