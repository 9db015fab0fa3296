// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reducer: applies a worker result to canonical state.
//!
//! Pure apart from date stamping: given the same state and worker result,
//! the emitted events and state mutations are deterministic.

use wdib_core::{
    append_dated_note, next_dated_id, parse_iso_date, today, Artifact, DeviceState, Event,
    HardwareRequest, Incident, IncidentReport, IncidentSeverity, IncidentStatus, StateStatus, Task,
    TaskStatus, WorkerResult, WorkerStatus,
};

fn append_proposed_tasks(
    state: &mut DeviceState,
    proposed: &[wdib_core::ProposedTask],
    events: &mut Vec<Event>,
) {
    let mut open_titles: Vec<String> = state
        .tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Done)
        .map(|task| task.title.trim().to_lowercase())
        .collect();
    let mut existing_ids: Vec<String> = state.tasks.iter().map(|task| task.id.clone()).collect();

    for item in proposed {
        let title = item.title.trim();
        if title.is_empty() {
            continue;
        }
        let title_key = title.to_lowercase();
        if open_titles.contains(&title_key) {
            continue;
        }

        let task_id = next_dated_id(&existing_ids, "task");
        existing_ids.push(task_id.clone());
        open_titles.push(title_key);

        let status = item.status.unwrap_or(TaskStatus::Todo);
        let mut task = Task::new(task_id.clone(), title, status);
        task.description = item.description.clone();
        task.blocked_by = item.blocked_by.clone();
        task.notes = item.notes.clone();
        state.tasks.push(task);

        events.push(Event::TaskCreated {
            task_id,
            title: title.to_string(),
        });
    }
}

fn apply_task_updates(
    state: &mut DeviceState,
    updates: &[wdib_core::TaskUpdate],
    events: &mut Vec<Event>,
) {
    for update in updates {
        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|task| task.id == update.task_id)
        else {
            continue;
        };

        let previous = task.status;
        let target = update.status.unwrap_or(previous);
        let mut metadata_changed = false;

        if previous != target {
            task.status = target;
            task.updated_on = today();
            if target == TaskStatus::Done {
                task.completed_on = Some(today());
                task.defer_until = None;
                task.defer_reason = String::new();
                task.selection_streak = 0;
            } else if task.completed_on.is_some() {
                task.completed_on = None;
            }
            events.push(Event::TaskStatusChanged {
                task_id: task.id.clone(),
                from: previous,
                to: target,
                reason: "worker_result.task_updates".to_string(),
            });
        }

        if let Some(raw_defer) = &update.defer_until {
            let previous_defer = task.defer_until.clone().unwrap_or_default();
            let raw = raw_defer.clone().unwrap_or_default().trim().to_string();
            if raw.is_empty() {
                if !previous_defer.is_empty() {
                    task.defer_until = None;
                    task.defer_reason = String::new();
                    metadata_changed = true;
                    events.push(Event::TaskDeferCleared {
                        task_id: task.id.clone(),
                        reason: "worker_result.task_updates cleared defer_until".to_string(),
                    });
                }
            } else {
                match parse_iso_date(&raw) {
                    None => {
                        task.defer_until = None;
                        task.defer_reason = String::new();
                        metadata_changed = true;
                        events.push(Event::TaskDeferInvalid {
                            task_id: task.id.clone(),
                            value: raw,
                            reason:
                                "worker_result.task_updates.defer_until is not a valid YYYY-MM-DD date"
                                    .to_string(),
                        });
                    }
                    Some(parsed) => {
                        let normalized = parsed.format("%Y-%m-%d").to_string();
                        if previous_defer != normalized {
                            task.defer_until = Some(normalized.clone());
                            metadata_changed = true;
                            events.push(Event::TaskDeferSet {
                                task_id: task.id.clone(),
                                defer_until: normalized,
                            });
                        }
                    }
                }
            }
        }

        if let Some(raw_reason) = &update.defer_reason {
            let raw = raw_reason.clone().unwrap_or_default().trim().to_string();
            let has_deferral = task
                .defer_until
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty());
            let normalized = if has_deferral { raw } else { String::new() };
            if task.defer_reason != normalized {
                task.defer_reason = normalized;
                metadata_changed = true;
            }
        }

        if metadata_changed && previous == target {
            task.updated_on = today();
        }

        let note = update.note.trim();
        if !note.is_empty() {
            task.notes = append_dated_note(&task.notes, note);
        }
    }
}

fn append_proposed_hardware(
    state: &mut DeviceState,
    proposed: &[wdib_core::ProposedHardwareRequest],
    events: &mut Vec<Event>,
) {
    let mut open_names: Vec<String> = state
        .hardware_requests
        .iter()
        .filter(|request| request.status.is_unresolved())
        .map(|request| request.name.trim().to_lowercase())
        .collect();
    let mut existing_ids: Vec<String> = state
        .hardware_requests
        .iter()
        .map(|request| request.id.clone())
        .collect();

    for item in proposed {
        let name = item.name.trim();
        let reason = item.reason.trim();
        if name.is_empty() || reason.is_empty() || item.detection.value.trim().is_empty() {
            continue;
        }

        let key = name.to_lowercase();
        if open_names.contains(&key) {
            continue;
        }

        let request_id = next_dated_id(&existing_ids, "hardware");
        existing_ids.push(request_id.clone());
        open_names.push(key);

        let mut request =
            HardwareRequest::new(request_id.clone(), name, reason, item.detection.clone());
        request.verify_command = item.verify_command.clone();
        request.notes = item.notes.clone();
        state.hardware_requests.push(request);

        events.push(Event::HardwareRequestCreated {
            request_id,
            name: name.to_string(),
        });
    }
}

fn append_incidents(state: &mut DeviceState, reports: &[IncidentReport], events: &mut Vec<Event>) {
    let mut existing_ids: Vec<String> = state
        .incidents
        .iter()
        .map(|incident| incident.id.clone())
        .collect();

    for report in reports {
        let title = report.title.trim();
        let summary = report.summary.trim();
        if title.is_empty() || summary.is_empty() {
            continue;
        }

        let incident_id = next_dated_id(&existing_ids, "incident");
        existing_ids.push(incident_id.clone());

        let mut incident = Incident::new(incident_id.clone(), title, report.severity, summary);
        incident.status = report.status;
        state.incidents.push(incident);

        events.push(Event::IncidentCreated {
            incident_id,
            title: title.to_string(),
            severity: report.severity,
        });
    }
}

fn append_artifacts(state: &mut DeviceState, artifacts: &[wdib_core::ArtifactReport]) {
    for item in artifacts {
        let path = item.path.trim();
        let description = item.description.trim();
        if path.is_empty() || description.is_empty() {
            continue;
        }
        state.artifacts.push(Artifact {
            path: path.to_string(),
            description: description.to_string(),
            created_on: today(),
        });
    }
}

fn derive_status(state: &DeviceState, worker_status: WorkerStatus) -> StateStatus {
    if worker_status == WorkerStatus::Failed {
        return StateStatus::Error;
    }
    if state.has_unresolved_hardware() {
        StateStatus::BlockedHardware
    } else {
        StateStatus::Active
    }
}

/// Mutate state according to the worker-result contract; return events.
pub fn apply_worker_result(state: &mut DeviceState, result: &WorkerResult) -> Vec<Event> {
    let mut events = Vec::new();

    append_proposed_tasks(state, &result.proposed_tasks, &mut events);
    apply_task_updates(state, &result.task_updates, &mut events);
    append_proposed_hardware(state, &result.proposed_hardware_requests, &mut events);
    append_incidents(state, &result.incidents, &mut events);
    append_artifacts(state, &result.artifacts);

    if let Some(becoming) = result
        .becoming
        .as_deref()
        .map(str::trim)
        .filter(|becoming| !becoming.is_empty())
    {
        if state.purpose.becoming != becoming {
            let old = std::mem::replace(&mut state.purpose.becoming, becoming.to_string());
            events.push(Event::BecomingUpdated {
                from: old,
                to: becoming.to_string(),
            });
        }
    }

    let summary = result.summary.trim().to_string();
    state.last_summary = summary.clone();

    if result.status == WorkerStatus::Failed {
        let report = IncidentReport {
            title: "Worker execution failed".to_string(),
            summary: if summary.is_empty() {
                "Worker returned FAILED status.".to_string()
            } else {
                summary
            },
            severity: IncidentSeverity::High,
            status: IncidentStatus::Open,
        };
        append_incidents(state, &[report], &mut events);
    }

    state.status = derive_status(state, result.status);
    events
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
