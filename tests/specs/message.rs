// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wdib message` CLI specs.

use crate::prelude::*;

#[test]
fn message_writes_inbox_file_with_ts_header() {
    let device = TestDevice::new();

    let (code, payload) = device.message("check the camera mount");

    assert_eq!(code, 0);
    assert_eq!(payload["ok"], true);

    let inbox = device.device_dir().join("runtime/human_message.txt");
    assert_eq!(payload["result"]["path"].as_str().unwrap(), inbox.display().to_string());

    let raw = std::fs::read_to_string(inbox).unwrap();
    assert!(raw.starts_with("ts="));
    assert!(raw.contains("check the camera mount"));
}

#[test]
fn empty_message_is_a_runtime_error() {
    let device = TestDevice::new();

    let (code, payload) = device.message("   ");

    assert_eq!(code, 1);
    assert_eq!(payload["ok"], false);
    assert!(payload["error"].as_str().unwrap().contains("empty"));
}

#[test]
fn missing_required_flag_is_a_usage_error() {
    let output = assert_cmd::Command::cargo_bin("wdib")
        .unwrap()
        .arg("message")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = assert_cmd::Command::cargo_bin("wdib")
        .unwrap()
        .arg("frobnicate")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
