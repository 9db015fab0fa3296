// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn os_runner_reports_success_and_output() {
    let runner = OsCommandRunner;
    let outcome = runner.run("echo hello", Duration::from_secs(5)).await;
    assert!(outcome.success);
    assert_eq!(outcome.output, "hello");
    assert!(!outcome.timed_out);
}

#[tokio::test]
async fn os_runner_reports_nonzero_exit() {
    let runner = OsCommandRunner;
    let outcome = runner.run("exit 3", Duration::from_secs(5)).await;
    assert!(!outcome.success);
    assert!(!outcome.timed_out);
}

#[tokio::test]
async fn os_runner_captures_stderr() {
    let runner = OsCommandRunner;
    let outcome = runner
        .run("echo out; echo err 1>&2", Duration::from_secs(5))
        .await;
    assert!(outcome.output.contains("out"));
    assert!(outcome.output.contains("err"));
}

#[tokio::test]
async fn os_runner_times_out() {
    let runner = OsCommandRunner;
    let outcome = runner.run("sleep 5", Duration::from_millis(100)).await;
    assert!(!outcome.success);
    assert!(outcome.timed_out);
    assert!(outcome.output.contains("timeout"));
}

#[tokio::test]
async fn run_with_timeout_describes_timeouts() {
    let mut cmd = tokio::process::Command::new("sleep");
    cmd.arg("5");
    let err = run_with_timeout(cmd, Duration::from_millis(100), "sleep test")
        .await
        .unwrap_err();
    assert!(err.contains("sleep test timed out"));
}

#[tokio::test]
async fn fake_runner_replays_scripted_outcomes_and_logs_calls() {
    let runner = FakeCommandRunner::new();
    runner.respond("lsusb", true, "Bus 001 Device 002: USB Camera");

    let hit = runner.run("lsusb", Duration::from_secs(1)).await;
    assert!(hit.success);
    assert!(hit.output.contains("USB Camera"));

    let miss = runner.run("true", Duration::from_secs(1)).await;
    assert!(!miss.success);

    assert_eq!(runner.calls(), vec!["lsusb", "true"]);
}
