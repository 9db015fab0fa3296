// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codex worker adapter.
//!
//! Spawns the external worker once per cycle with the full work-order JSON
//! embedded in the prompt, then reads, normalizes, and validates the result
//! file the worker wrote at the pre-declared `result_path`.

use crate::env;
use crate::extract::extract_json_object;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;
use wdib_core::{validate_worker_result, ContractValidationError, WorkOrder, WorkerResult};

/// How much trailing worker output is kept as event evidence.
const OUTPUT_TAIL_CHARS: usize = 4000;

/// Filesystem sandbox handed to the worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxMode {
    ReadOnly,
    WorkspaceWrite,
    DangerFullAccess,
}

impl SandboxMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "read-only" => Some(SandboxMode::ReadOnly),
            "workspace-write" => Some(SandboxMode::WorkspaceWrite),
            "danger-full-access" => Some(SandboxMode::DangerFullAccess),
            _ => None,
        }
    }

    pub fn as_flag(self) -> &'static str {
        match self {
            SandboxMode::ReadOnly => "read-only",
            SandboxMode::WorkspaceWrite => "workspace-write",
            SandboxMode::DangerFullAccess => "danger-full-access",
        }
    }
}

/// Worker execution failed or did not produce a valid result.
#[derive(Debug, Error)]
pub enum WorkerRunFailure {
    #[error("codex binary was not found in PATH")]
    BinaryMissing,
    #[error("failed to spawn codex: {0}")]
    Spawn(String),
    #[error("codex exec timed out after {0}s")]
    Timeout(u64),
    #[error("codex exec failed ({code}): {detail}")]
    Exit { code: i32, detail: String },
    #[error("worker result file not found: {0}")]
    MissingResult(PathBuf),
    #[error("worker result is not a JSON object: {0}")]
    Unparseable(String),
    #[error(transparent)]
    Contract(#[from] ContractValidationError),
    #[error("failed to persist skip result: {0}")]
    Io(#[from] std::io::Error),
}

/// Evidence captured around one worker run.
#[derive(Debug, Clone)]
pub struct WorkerRunMetadata {
    pub mode: String,
    pub returncode: Option<i32>,
    pub stdout_tail: String,
    pub stderr_tail: String,
}

fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        return text.to_string();
    }
    text.chars().skip(count - limit).collect()
}

/// Compose the worker prompt: discipline policy plus the work-order JSON.
pub fn prompt_from_work_order(order: &WorkOrder) -> String {
    let order_json = serde_json::to_value(order)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_default();

    let web_search_line = if env::codex_web_search_enabled() {
        "- Web search is enabled: use it only when local evidence is insufficient, and record what you searched in the summary."
    } else {
        "- Web search is disabled for this run; rely on local evidence."
    };

    format!(
        "You are the WDIB worker plane.\n\
         Execute the objective from the provided work order.\n\
         You may inspect and modify code only inside allowed_paths.\n\
         When finished, write ONLY the worker_result JSON to result_path.\n\
         Do not invent fields. Follow schema_version 1.0 exactly.\n\
         \n\
         Engineering discipline:\n\
         - Debug before patching: find root cause before proposing fixes.\n\
         - For behavior changes, write or update tests first, then make them pass.\n\
         - Before reporting COMPLETED, run concrete verification commands and report evidence.\n\
         - Include verification evidence in worker_result.summary.\n\
         {web_search_line}\n\
         - If the mission is unknown, keep observing and building sensing capability; do not lock in a becoming early.\n\
         - If you propose a becoming, make it human/environment-outcome oriented.\n\
         - Do not use framework-internal becoming statements (control plane, schemas, loops, orchestration).\n\
         \n\
         WORK_ORDER_JSON:\n\
         {order_json}\n"
    )
}

/// Normalize a raw worker payload onto the canonical contract shape.
///
/// Legacy statuses map (`SUCCESS -> COMPLETED`, `ERROR -> FAILED`,
/// `PENDING -> BLOCKED`), unknown statuses coerce to `BLOCKED`, an empty
/// `schema_version`/`cycle_id` is filled in, legacy `tasks` becomes
/// `proposed_tasks`, and incident severity/status spellings are repaired.
pub fn normalize_worker_result(value: &mut Value, fallback_cycle_id: &str) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    let schema_version_missing = object
        .get("schema_version")
        .and_then(Value::as_str)
        .map_or(true, |raw| raw.trim().is_empty());
    if schema_version_missing {
        object.insert(
            "schema_version".to_string(),
            Value::String(wdib_core::SCHEMA_VERSION.to_string()),
        );
    }

    let cycle_id_missing = object
        .get("cycle_id")
        .and_then(Value::as_str)
        .map_or(true, |raw| raw.trim().is_empty());
    if cycle_id_missing {
        object.insert(
            "cycle_id".to_string(),
            Value::String(fallback_cycle_id.to_string()),
        );
    }

    if let Some(raw_status) = object.get("status").and_then(Value::as_str) {
        let upper = raw_status.trim().to_uppercase();
        let canonical = match upper.as_str() {
            "COMPLETED" | "BLOCKED" | "FAILED" => upper,
            "SUCCESS" => "COMPLETED".to_string(),
            "ERROR" => "FAILED".to_string(),
            _ => "BLOCKED".to_string(),
        };
        object.insert("status".to_string(), Value::String(canonical));
    }

    // Legacy field name for proposed tasks.
    if !object.contains_key("proposed_tasks") {
        if let Some(tasks) = object.remove("tasks") {
            object.insert("proposed_tasks".to_string(), tasks);
        }
    }

    if let Some(incidents) = object.get_mut("incidents").and_then(Value::as_array_mut) {
        for incident in incidents {
            let Some(entry) = incident.as_object_mut() else {
                continue;
            };
            if let Some(raw) = entry.get("severity").and_then(Value::as_str) {
                let upper = raw.trim().to_uppercase();
                let canonical = match upper.as_str() {
                    "LOW" | "MEDIUM" | "HIGH" => upper,
                    _ => "MEDIUM".to_string(),
                };
                entry.insert("severity".to_string(), Value::String(canonical));
            }
            if let Some(raw) = entry.get("status").and_then(Value::as_str) {
                let upper = raw.trim().to_uppercase();
                let canonical = match upper.as_str() {
                    "OPEN" | "RESOLVED" => upper,
                    _ => "OPEN".to_string(),
                };
                entry.insert("status".to_string(), Value::String(canonical));
            }
        }
    }
}

fn write_result_file(path: &Path, payload: &Value) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut rendered = serde_json::to_string_pretty(payload).unwrap_or_default();
    rendered.push('\n');
    std::fs::write(path, rendered)
}

fn skip_result(order: &WorkOrder) -> Result<(WorkerResult, WorkerRunMetadata), WorkerRunFailure> {
    let result = WorkerResult::bare(
        order.cycle_id.as_str(),
        wdib_core::WorkerStatus::Blocked,
        "Worker execution skipped because WDIB_SKIP_CODEX=true.",
    );
    let value = serde_json::to_value(&result)
        .map_err(|err| WorkerRunFailure::Unparseable(err.to_string()))?;
    validate_worker_result(&value)?;
    write_result_file(Path::new(&order.result_path), &value)?;
    Ok((
        result,
        WorkerRunMetadata {
            mode: "skipped".to_string(),
            returncode: Some(0),
            stdout_tail: String::new(),
            stderr_tail: String::new(),
        },
    ))
}

fn read_result(order: &WorkOrder) -> Result<WorkerResult, WorkerRunFailure> {
    let result_path = Path::new(&order.result_path);
    if !result_path.exists() {
        return Err(WorkerRunFailure::MissingResult(result_path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(result_path)?;
    let mut value = extract_json_object(&raw)
        .ok_or_else(|| WorkerRunFailure::Unparseable(result_path.display().to_string()))?;

    normalize_worker_result(&mut value, &order.cycle_id);
    validate_worker_result(&value)?;
    serde_json::from_value(value).map_err(|err| WorkerRunFailure::Unparseable(err.to_string()))
}

/// Run the codex worker for one work order.
pub async fn execute_work_order(
    order: &WorkOrder,
    project_root: &Path,
    timeout: Duration,
) -> Result<(WorkerResult, WorkerRunMetadata), WorkerRunFailure> {
    if env::skip_codex() {
        return skip_result(order);
    }

    let codex_bin = which::which("codex").map_err(|_| WorkerRunFailure::BinaryMissing)?;
    let prompt = prompt_from_work_order(order);

    let mut command = Command::new(codex_bin);
    command
        .arg("exec")
        .arg("--sandbox")
        .arg(env::codex_sandbox().as_flag())
        .arg("--ask-for-approval")
        .arg("never")
        .arg("--cd")
        .arg(project_root);
    if let Some(model) = env::codex_model() {
        command.arg("--model").arg(model);
    }
    if env::codex_web_search_enabled() {
        command.arg("--search");
    }
    command.arg(prompt);

    info!(cycle_id = %order.cycle_id, "spawning codex worker");

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(io_err)) => return Err(WorkerRunFailure::Spawn(io_err.to_string())),
        Err(_elapsed) => return Err(WorkerRunFailure::Timeout(timeout.as_secs())),
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let metadata = WorkerRunMetadata {
        mode: "live".to_string(),
        returncode: output.status.code(),
        stdout_tail: tail_chars(&stdout, OUTPUT_TAIL_CHARS),
        stderr_tail: tail_chars(&stderr, OUTPUT_TAIL_CHARS),
    };

    if !output.status.success() {
        let detail_source = if stderr.trim().is_empty() {
            stdout
        } else {
            stderr
        };
        let detail: String = detail_source.trim().chars().take(300).collect();
        return Err(WorkerRunFailure::Exit {
            code: output.status.code().unwrap_or(-1),
            detail,
        });
    }

    let result = read_result(order)?;
    Ok((result, metadata))
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
