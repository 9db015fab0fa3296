// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

const DEVICE_ID: &str = "11111111-2222-4333-8444-555555555555";

#[tokio::test]
#[serial]
async fn skip_flag_short_circuits() {
    std::env::set_var("WDIB_SKIP_GIT_COMMIT", "true");
    let dir = tempdir().unwrap();
    let outcome = commit_device_changes(dir.path(), DEVICE_ID, 3, "ACTIVE").await;
    std::env::remove_var("WDIB_SKIP_GIT_COMMIT");

    assert!(!outcome.committed);
    assert!(!outcome.pushed);
    assert!(outcome.message.contains("WDIB_SKIP_GIT_COMMIT"));
}

#[tokio::test]
#[serial]
async fn failure_outside_a_repository_is_reported_not_raised() {
    std::env::remove_var("WDIB_SKIP_GIT_COMMIT");
    let dir = tempdir().unwrap();
    let outcome = commit_device_changes(dir.path(), DEVICE_ID, 1, "ACTIVE").await;

    assert!(!outcome.committed);
    assert!(!outcome.pushed);
    assert!(!outcome.message.is_empty());
}

#[test]
fn short_id_handles_short_device_ids() {
    assert_eq!(short_id("11111111-2222"), "11111111");
    assert_eq!(short_id("abc"), "abc");
}
