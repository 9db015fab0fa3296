// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn paths(dir: &std::path::Path) -> DevicePaths {
    DevicePaths::new(dir, "device")
}

#[test]
fn enqueue_then_load_roundtrips_body() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    enqueue_human_message(&paths, "  check the camera mount  ").unwrap();
    let body = load_and_clear_human_message(&paths).unwrap();
    assert_eq!(body, "check the camera mount");
}

#[test]
fn load_clears_the_inbox() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    enqueue_human_message(&paths, "hello").unwrap();
    load_and_clear_human_message(&paths).unwrap();

    assert!(!paths.human_message.exists());
    assert_eq!(load_and_clear_human_message(&paths).unwrap(), "");
}

#[test]
fn ts_header_is_stripped() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    enqueue_human_message(&paths, "line one\nline two").unwrap();
    let raw = std::fs::read_to_string(&paths.human_message).unwrap();
    assert!(raw.starts_with("ts="));

    let body = load_and_clear_human_message(&paths).unwrap();
    assert_eq!(body, "line one\nline two");
}

#[test]
fn empty_message_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());
    assert!(enqueue_human_message(&paths, "   ").is_err());
}

#[test]
fn newer_message_overwrites_pending_one() {
    let dir = tempdir().unwrap();
    let paths = paths(dir.path());

    enqueue_human_message(&paths, "first").unwrap();
    enqueue_human_message(&paths, "second").unwrap();

    assert_eq!(load_and_clear_human_message(&paths).unwrap(), "second");
}
