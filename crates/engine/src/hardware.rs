// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hardware reconciler: advances OPEN/DETECTED requests on observed signals.
//!
//! Probes never raise; failures become truncated evidence on the request.
//! Transitions are idempotent across repeated ticks.

use std::path::Path;
use std::time::Duration;
use wdib_core::{append_dated_note, today, Detection, DetectionKind, Event, HardwareStatus};
use wdib_adapters::CommandRunner;

const COMMAND_EVIDENCE_LIMIT: usize = 200;
const VERIFY_EVIDENCE_LIMIT: usize = 240;

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

async fn detect<R: CommandRunner>(
    detection: &Detection,
    runner: &R,
    timeout: Duration,
) -> (bool, String) {
    let value = detection.value.trim();
    match detection.kind {
        DetectionKind::PathExists => (Path::new(value).exists(), format!("path_exists({value})")),
        DetectionKind::GlobExists => match glob::glob(value) {
            Ok(paths) => {
                let count = paths.filter_map(Result::ok).count();
                (count > 0, format!("glob_exists({value}) -> {count} match(es)"))
            }
            Err(error) => (false, format!("glob_exists({value}) -> invalid pattern: {error}")),
        },
        DetectionKind::CommandSuccess => {
            let outcome = runner.run(value, timeout).await;
            (
                outcome.success,
                format!(
                    "command_success({value}) -> {}",
                    truncate(&outcome.output, COMMAND_EVIDENCE_LIMIT)
                ),
            )
        }
        DetectionKind::LsusbContains => {
            let outcome = runner.run("lsusb", timeout).await;
            if !outcome.success {
                return (
                    false,
                    format!(
                        "lsusb failed: {}",
                        truncate(&outcome.output, COMMAND_EVIDENCE_LIMIT)
                    ),
                );
            }
            let found = outcome.output.to_lowercase().contains(&value.to_lowercase());
            (found, format!("lsusb_contains({value})"))
        }
    }
}

/// Advance OPEN/DETECTED requests based on machine-observed signals.
pub async fn probe_hardware_requests<R: CommandRunner>(
    state: &mut wdib_core::DeviceState,
    runner: &R,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let run_date = today();

    for request in &mut state.hardware_requests {
        if matches!(
            request.status,
            HardwareStatus::Verified | HardwareStatus::Failed
        ) {
            continue;
        }

        request.last_checked_on = Some(run_date.clone());

        let (detected, evidence) = detect(&request.detection, runner, timeout).await;
        let previous_status = request.status;

        if detected {
            if request.status == HardwareStatus::Open {
                request.status = HardwareStatus::Detected;
                request.detected_on = Some(run_date.clone());
                events.push(Event::HardwareStatusChanged {
                    request_id: request.id.clone(),
                    from: previous_status,
                    to: HardwareStatus::Detected,
                    evidence: evidence.clone(),
                });
            }

            let verify_command = request.verify_command.trim().to_string();
            if verify_command.is_empty() {
                let from = request.status;
                request.status = HardwareStatus::Verified;
                request.verified_on = Some(run_date.clone());
                events.push(Event::HardwareStatusChanged {
                    request_id: request.id.clone(),
                    from,
                    to: HardwareStatus::Verified,
                    evidence: "No verify_command provided; detection accepted as verification."
                        .to_string(),
                });
            } else {
                let outcome = runner.run(&verify_command, timeout).await;
                let verify_output = truncate(&outcome.output, VERIFY_EVIDENCE_LIMIT);
                if outcome.success {
                    let from = request.status;
                    request.status = HardwareStatus::Verified;
                    request.verified_on = Some(run_date.clone());
                    request.notes = append_dated_note(
                        &request.notes,
                        &format!("Verification passed: {verify_command}"),
                    );
                    events.push(Event::HardwareStatusChanged {
                        request_id: request.id.clone(),
                        from,
                        to: HardwareStatus::Verified,
                        evidence: verify_output,
                    });
                } else {
                    request.verify_failures += 1;
                    request.notes = append_dated_note(
                        &request.notes,
                        &format!("Verification failed ({verify_command}): {verify_output}"),
                    );
                    events.push(Event::HardwareVerificationFailed {
                        request_id: request.id.clone(),
                        verify_failures: request.verify_failures,
                        evidence: verify_output,
                    });
                }
            }
        } else if request.status == HardwareStatus::Detected {
            request.status = HardwareStatus::Open;
            request.detected_on = None;
            request.notes = append_dated_note(
                &request.notes,
                "Detection signal no longer present; moved back to OPEN.",
            );
            events.push(Event::HardwareStatusChanged {
                request_id: request.id.clone(),
                from: HardwareStatus::Detected,
                to: HardwareStatus::Open,
                evidence,
            });
        }
    }

    events
}

#[cfg(test)]
#[path = "hardware_tests.rs"]
mod tests;
