// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema-backed contracts for the control/worker exchange.
//!
//! Every payload crossing a boundary (disk, CLI, worker) is validated
//! against the embedded JSON schema documents. Errors carry a compact,
//! stable message of the form `<location>: <reason>; …` capped at the
//! first ten problems.

use once_cell::sync::Lazy;
use serde_json::Value;
use thiserror::Error;

const STATE_SCHEMA_SOURCE: &str = include_str!("../schemas/state.schema.json");
const WORK_ORDER_SCHEMA_SOURCE: &str = include_str!("../schemas/work_order.schema.json");
const WORKER_RESULT_SCHEMA_SOURCE: &str = include_str!("../schemas/worker_result.schema.json");

const MAX_REPORTED_ERRORS: usize = 10;

static STATE_SCHEMA: Lazy<Option<Value>> =
    Lazy::new(|| serde_json::from_str(STATE_SCHEMA_SOURCE).ok());
static WORK_ORDER_SCHEMA: Lazy<Option<Value>> =
    Lazy::new(|| serde_json::from_str(WORK_ORDER_SCHEMA_SOURCE).ok());
static WORKER_RESULT_SCHEMA: Lazy<Option<Value>> =
    Lazy::new(|| serde_json::from_str(WORKER_RESULT_SCHEMA_SOURCE).ok());

/// Payload failed schema validation at a contract boundary.
#[derive(Debug, Error)]
#[error("invalid {label}: {detail}")]
pub struct ContractValidationError {
    pub label: String,
    pub detail: String,
}

impl ContractValidationError {
    fn new(label: &str, detail: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            detail: detail.into(),
        }
    }
}

fn location_label(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "<root>".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

fn validate_against(
    schema: &'static Lazy<Option<Value>>,
    payload: &Value,
    label: &str,
) -> Result<(), ContractValidationError> {
    let schema = schema
        .as_ref()
        .ok_or_else(|| ContractValidationError::new(label, "embedded schema is not valid JSON"))?;

    let validator = jsonschema::validator_for(schema)
        .map_err(|err| ContractValidationError::new(label, format!("schema failed to compile: {err}")))?;

    let mut problems: Vec<String> = Vec::new();
    for error in validator.iter_errors(payload) {
        let location = location_label(&error.instance_path.to_string());
        problems.push(format!("{location}: {error}"));
        if problems.len() == MAX_REPORTED_ERRORS {
            break;
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ContractValidationError::new(label, problems.join("; ")))
    }
}

/// Validate a device-state payload.
pub fn validate_state(payload: &Value) -> Result<(), ContractValidationError> {
    validate_against(&STATE_SCHEMA, payload, "state")
}

/// Validate a work-order payload.
pub fn validate_work_order(payload: &Value) -> Result<(), ContractValidationError> {
    validate_against(&WORK_ORDER_SCHEMA, payload, "work_order")
}

/// Validate a worker-result payload.
pub fn validate_worker_result(payload: &Value) -> Result<(), ContractValidationError> {
    validate_against(&WORKER_RESULT_SCHEMA, payload, "worker_result")
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
