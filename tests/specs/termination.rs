// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Termination command and absorbing-state specs.

use crate::prelude::*;

#[test]
fn terminate_message_terminates_on_the_same_tick() {
    let device = TestDevice::new();

    let (code, _) = device.message("please terminate this device now");
    assert_eq!(code, 0);

    let (code, payload) = device.tick();
    assert_eq!(code, 0);
    assert_eq!(payload["result"]["status"], "TERMINATED");
    assert_eq!(payload["result"]["day"], 1);

    let types = device.event_types();
    assert!(types.contains(&"HUMAN_MESSAGE_RECEIVED".to_string()));
    assert!(types.contains(&"HUMAN_COMMAND_TERMINATE".to_string()));

    let state = device.state();
    assert_eq!(state["status"], "TERMINATED");
    assert_ne!(state["purpose"]["becoming"], "");

    // Closing artifacts are still written.
    assert!(device.device_dir().join("public/status.json").exists());
    assert!(payload["result"]["session_path"].as_str().is_some());
}

#[test]
fn goodbye_counts_as_termination() {
    let device = TestDevice::new();
    device.tick();

    device.message("goodbye little one");
    let (_, payload) = device.tick();

    assert_eq!(payload["result"]["status"], "TERMINATED");
}

#[test]
fn terminated_device_skips_without_new_message() {
    let device = TestDevice::new();
    device.message("shut down");
    device.tick();

    let (code, payload) = device.tick();

    assert_eq!(code, 0);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["result"]["skipped"], true);
    assert_eq!(payload["result"]["day"], 1);
    assert!(payload["result"].get("cycle_id").is_none());

    // Day does not move while absorbed.
    assert_eq!(device.state()["day"], 1);
}

#[test]
fn non_terminal_message_is_consumed_and_logged() {
    let device = TestDevice::new();

    device.message("nice work yesterday");
    device.tick();

    let events = device.events();
    let received: Vec<_> = events
        .iter()
        .filter(|event| event["type"] == "HUMAN_MESSAGE_RECEIVED")
        .collect();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["preview"], "nice work yesterday");

    // Inbox is cleared; the next tick sees nothing.
    device.tick();
    let received_after: Vec<_> = device
        .events()
        .iter()
        .filter(|event| event["type"] == "HUMAN_MESSAGE_RECEIVED")
        .cloned()
        .collect();
    assert_eq!(received_after.len(), 1);
}
