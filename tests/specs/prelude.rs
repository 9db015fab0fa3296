// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DEVICE_ID: &str = "11111111-2222-4333-8444-555555555555";

/// One isolated device home for a spec.
pub struct TestDevice {
    home: TempDir,
}

impl TestDevice {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        self.home.path()
    }

    pub fn device_dir(&self) -> PathBuf {
        self.root().join("devices").join(DEVICE_ID)
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("wdib").unwrap();
        cmd.env("WDIB_HOME", self.root())
            .env("WDIB_DEVICE_ID", DEVICE_ID)
            .env("WDIB_SKIP_CODEX", "true")
            .env("WDIB_SKIP_GIT_COMMIT", "true")
            .env_remove("WDIB_NOTIFICATION_CHANNELS")
            .env_remove("OPENAI_API_KEY");
        cmd
    }

    /// Run `wdib tick`; returns (exit_code, parsed stdout JSON).
    pub fn tick(&self) -> (i32, Value) {
        let output = self.command().arg("tick").output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload: Value = serde_json::from_str(stdout.trim())
            .unwrap_or_else(|_| panic!("stdout is not JSON: {stdout}"));
        (output.status.code().unwrap_or(-1), payload)
    }

    /// Run `wdib message --text <body>`; returns (exit_code, stdout JSON).
    pub fn message(&self, text: &str) -> (i32, Value) {
        let output = self
            .command()
            .args(["message", "--text", text])
            .output()
            .unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload: Value = serde_json::from_str(stdout.trim())
            .unwrap_or_else(|_| panic!("stdout is not JSON: {stdout}"));
        (output.status.code().unwrap_or(-1), payload)
    }

    pub fn write_mission(&self, text: &str) {
        std::fs::write(self.root().join("MISSION.md"), text).unwrap();
    }

    /// Current on-disk device state.
    pub fn state(&self) -> Value {
        let raw = std::fs::read_to_string(self.device_dir().join("state.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Every parsed line of the event log.
    pub fn events(&self) -> Vec<Value> {
        let path = self.device_dir().join("events.ndjson");
        if !path.exists() {
            return Vec::new();
        }
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|event| event["type"].as_str().map(str::to_string))
            .collect()
    }

    /// Write a seeded state.json (creating the device layout).
    pub fn seed_state(&self, state: &Value) {
        std::fs::create_dir_all(self.device_dir()).unwrap();
        let rendered = format!("{}\n", serde_json::to_string_pretty(state).unwrap());
        std::fs::write(self.device_dir().join("state.json"), rendered).unwrap();
    }

    /// Latest work order payload, if any cycle planned one.
    pub fn last_work_order(&self) -> Option<Value> {
        let dir = self.device_dir().join("runtime/work_orders");
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .ok()?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .collect();
        paths.sort();
        let raw = std::fs::read_to_string(paths.pop()?).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

/// A minimal schema-valid device state.
pub fn base_state() -> Value {
    json!({
        "schema_version": "1.0",
        "device_id": DEVICE_ID,
        "awoke_on": "2026-02-24",
        "day": 1,
        "purpose": {"becoming": "", "mission_path": "MISSION.md"},
        "status": "ACTIVE",
        "tasks": [],
        "hardware_requests": [],
        "incidents": [],
        "artifacts": [],
        "last_summary": ""
    })
}

pub fn task_json(id: &str, title: &str, status: &str, streak: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": status,
        "blocked_by": "",
        "created_on": "2026-02-24",
        "updated_on": "2026-02-24",
        "completed_on": null,
        "defer_until": null,
        "defer_reason": "",
        "selection_streak": streak,
        "notes": ""
    })
}

pub fn hardware_json(id: &str, name: &str, kind: &str, value: &str, verify: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "reason": "spec fixture",
        "status": "OPEN",
        "detection": {"kind": kind, "value": value},
        "verify_command": verify,
        "requested_on": "2026-02-24",
        "last_checked_on": null,
        "detected_on": null,
        "verified_on": null,
        "verify_failures": 0,
        "notes": ""
    })
}

/// Yesterday's date as `YYYY-MM-DD`.
pub fn yesterday() -> String {
    (chrono::Local::now().date_naive() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}
