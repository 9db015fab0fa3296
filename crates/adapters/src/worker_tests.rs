// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use serial_test::serial;
use tempfile::tempdir;
use wdib_core::{WorkOrderContext, WorkerStatus};

fn order_with_result_path(result_path: &str) -> WorkOrder {
    WorkOrder {
        schema_version: "1.0".to_string(),
        cycle_id: "cycle-001-20260101T000000".to_string(),
        created_on: "2026-01-01T00:00:00".to_string(),
        device_id: "11111111-2222-4333-8444-555555555555".to_string(),
        objective: "Fix flaky parser task".to_string(),
        constraints: vec!["Work only inside allowed_paths.".to_string()],
        allowed_paths: vec!["/repo/src".to_string(), "/repo/tests".to_string()],
        context: WorkOrderContext {
            becoming: String::new(),
            mission_excerpt: String::new(),
            tasks: Vec::new(),
            hardware_requests: Vec::new(),
            incidents: Vec::new(),
        },
        result_path: result_path.to_string(),
        result_schema_version: "1.0".to_string(),
    }
}

#[test]
fn prompt_includes_engineering_discipline_requirements() {
    let order = order_with_result_path("/repo/devices/x/runtime/worker_results/cycle-001.json");
    let prompt = prompt_from_work_order(&order);

    assert!(prompt.contains("find root cause before proposing fixes"));
    assert!(prompt.contains("write or update tests first"));
    assert!(prompt.contains("run concrete verification commands and report evidence"));
    assert!(prompt.contains("Include verification evidence in worker_result.summary."));
    assert!(prompt.contains("make it human/environment-outcome oriented"));
    assert!(prompt.contains("Do not use framework-internal becoming statements"));
    assert!(prompt.contains("WORK_ORDER_JSON:"));
    assert!(prompt.contains("\"objective\": \"Fix flaky parser task\""));
}

#[test]
fn normalization_maps_legacy_statuses() {
    for (legacy, canonical) in [
        ("SUCCESS", "COMPLETED"),
        ("ERROR", "FAILED"),
        ("PENDING", "BLOCKED"),
        ("completed", "COMPLETED"),
        ("SOMETHING_ELSE", "BLOCKED"),
    ] {
        let mut value = json!({"status": legacy});
        normalize_worker_result(&mut value, "cycle-001");
        assert_eq!(value["status"], canonical, "legacy {legacy}");
    }
}

#[test]
fn normalization_fills_schema_version_and_cycle_id() {
    let mut value = json!({"status": "COMPLETED", "summary": "ok", "cycle_id": ""});
    normalize_worker_result(&mut value, "cycle-007-20260101T000000");
    assert_eq!(value["schema_version"], "1.0");
    assert_eq!(value["cycle_id"], "cycle-007-20260101T000000");
}

#[test]
fn normalization_keeps_mismatched_cycle_id() {
    let mut value = json!({"status": "COMPLETED", "cycle_id": "cycle-999-other"});
    normalize_worker_result(&mut value, "cycle-007-20260101T000000");
    assert_eq!(value["cycle_id"], "cycle-999-other");
}

#[test]
fn normalization_migrates_legacy_tasks_field() {
    let mut value = json!({
        "status": "COMPLETED",
        "tasks": [{"title": "calibrate lens"}]
    });
    normalize_worker_result(&mut value, "cycle-001");
    assert!(value.get("tasks").is_none());
    assert_eq!(value["proposed_tasks"][0]["title"], "calibrate lens");
}

#[test]
fn normalization_repairs_incident_spellings() {
    let mut value = json!({
        "status": "COMPLETED",
        "incidents": [
            {"title": "a", "summary": "s", "severity": "critical", "status": "ack"},
            {"title": "b", "summary": "s", "severity": "low", "status": "resolved"}
        ]
    });
    normalize_worker_result(&mut value, "cycle-001");
    assert_eq!(value["incidents"][0]["severity"], "MEDIUM");
    assert_eq!(value["incidents"][0]["status"], "OPEN");
    assert_eq!(value["incidents"][1]["severity"], "LOW");
    assert_eq!(value["incidents"][1]["status"], "RESOLVED");
}

#[tokio::test]
#[serial]
async fn skip_mode_writes_blocked_result() {
    let dir = tempdir().unwrap();
    let result_path = dir.path().join("worker_results/cycle-001.json");
    let order = order_with_result_path(result_path.to_str().unwrap());

    std::env::set_var("WDIB_SKIP_CODEX", "true");
    let (result, metadata) = execute_work_order(&order, dir.path(), Duration::from_secs(60))
        .await
        .unwrap();
    std::env::remove_var("WDIB_SKIP_CODEX");

    assert_eq!(result.status, WorkerStatus::Blocked);
    assert_eq!(metadata.mode, "skipped");
    assert!(result_path.exists());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(written["status"], "BLOCKED");
    assert_eq!(written["cycle_id"], order.cycle_id);
}

#[test]
fn tail_keeps_only_trailing_chars() {
    let long = "x".repeat(5000);
    assert_eq!(tail_chars(&long, 4000).len(), 4000);
    assert_eq!(tail_chars("short", 4000), "short");
}
