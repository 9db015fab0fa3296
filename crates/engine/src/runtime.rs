// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick runtime: sequences one full orchestration cycle.
//!
//! Hardware and adapter failures are recovered locally as events; worker
//! and contract failures fail the cycle (state goes ERROR, an incident is
//! appended, failure notifications fire, and the error re-raises for the
//! CLI to exit non-zero).

use crate::becoming::{clear_framework_becoming, reject_worker_becoming};
use crate::hardware::probe_hardware_requests;
use crate::mission::{load_mission_text, mission_known};
use crate::planner::plan_work_order;
use crate::publication::{build_public_daily_summary, build_public_status, StatusInputs};
use crate::reducer::apply_worker_result;
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use wdib_adapters::{
    commit_device_changes, env as adapter_env, execute_work_order, ChannelOutcome, CycleContext,
    FailureContext, NotificationRouter, OsCommandRunner, WorkerRunFailure,
};
use wdib_core::{
    is_terminate_command, next_dated_id, today, DeviceState, Event, GitOutcome, Incident,
    IncidentSeverity, StateStatus,
};
use wdib_storage::{
    enqueue_human_message, load_and_clear_human_message, ProjectPaths, Repository, SessionRecord,
    StorageError,
};

/// Becoming recorded when a human terminates the device.
const CLOSING_BECOMING: &str = "Rest, with my work complete and my journal closed.";
const CLOSING_SUMMARY: &str =
    "Received a human termination command and gracefully closed this chapter.";

/// How much of a human message is kept as event evidence.
const MESSAGE_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Worker(#[from] WorkerRunFailure),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inputs resolved once at CLI entry.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub paths: ProjectPaths,
    pub device_id: String,
}

/// Structured outcome of one tick, rendered as CLI JSON.
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub skipped: bool,
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,
    pub day: u32,
    pub status: StateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitOutcome>,
}

fn cycle_id_for(day: u32) -> String {
    format!("cycle-{day:03}-{}", Local::now().format("%Y%m%dT%H%M%S"))
}

fn preview(text: &str) -> String {
    text.chars().take(MESSAGE_PREVIEW_CHARS).collect()
}

fn record_runtime_failure(state: &mut DeviceState, message: &str) {
    let existing: Vec<String> = state
        .incidents
        .iter()
        .map(|incident| incident.id.clone())
        .collect();
    let incident_id = next_dated_id(&existing, "incident");
    state.incidents.push(Incident::new(
        incident_id,
        "WDIB runtime failure",
        IncidentSeverity::High,
        message,
    ));
    state.status = StateStatus::Error;
    state.last_summary = message.to_string();
}

fn append_notification_events(
    repo: &Repository,
    cycle_id: &str,
    outcomes: &[ChannelOutcome],
) -> Result<(), StorageError> {
    for outcome in outcomes {
        let event = if outcome.sent {
            Event::NotificationSent {
                channel: outcome.channel.clone(),
            }
        } else {
            Event::NotificationFailed {
                channel: outcome.channel.clone(),
                reason: outcome.reason.clone().unwrap_or_default(),
            }
        };
        repo.append_event(Some(cycle_id), &event)?;
    }
    Ok(())
}

/// Write a pending human message for the next tick.
pub fn enqueue_message(config: &RuntimeConfig, text: &str) -> Result<std::path::PathBuf, TickError> {
    let repo = Repository::open(&config.paths.devices_dir, &config.device_id)?;
    Ok(enqueue_human_message(repo.paths(), text)?)
}

/// Run one orchestration cycle.
pub async fn run_tick(config: &RuntimeConfig) -> Result<TickResult, TickError> {
    let mission_text = load_mission_text(&config.paths.mission_file);
    let mission_path = config.paths.mission_file.display().to_string();

    let repo = Repository::open(&config.paths.devices_dir, &config.device_id)?;
    let mut state = repo.load_state(&mission_path)?;

    if state.status != StateStatus::Terminated {
        if let Some(event) = clear_framework_becoming(&mut state, &mission_text) {
            repo.append_event(None, &event)?;
        }
    }

    let human_message = load_and_clear_human_message(repo.paths())?;
    if !human_message.is_empty() {
        repo.append_event(
            None,
            &Event::HumanMessageReceived {
                preview: preview(&human_message),
            },
        )?;
    }

    // Absorbing state: a terminated device only wakes for a new message.
    if state.status == StateStatus::Terminated && human_message.is_empty() {
        info!(device_id = %config.device_id, "device is terminated; tick skipped");
        return Ok(TickResult {
            skipped: true,
            device_id: config.device_id.clone(),
            cycle_id: None,
            day: state.day,
            status: state.status,
            summary: None,
            session_path: None,
            git: None,
        });
    }

    let day = state.day + 1;
    let cycle_id = cycle_id_for(day);

    repo.append_event(
        Some(&cycle_id),
        &Event::CycleStarted {
            day,
            status: state.status,
        },
    )?;

    if !mission_known(&mission_text) {
        repo.append_event(
            Some(&cycle_id),
            &Event::MissionUnknown {
                reason: "Mission file is empty; running discovery objectives.".to_string(),
            },
        )?;
    }

    if is_terminate_command(&human_message) {
        return terminate(config, &repo, &mut state, &mission_text, &cycle_id, day, &human_message)
            .await;
    }

    match run_cycle(config, &repo, &mut state, &mission_text, &cycle_id, day).await {
        Ok(result) => Ok(result),
        Err(err) => {
            let message = err.to_string();
            error!(%cycle_id, error = %message, "cycle failed");

            record_runtime_failure(&mut state, &message);
            if let Err(save_err) = repo.save_state(&state) {
                warn!(error = %save_err, "failed to persist failure state");
            }
            repo.append_event(
                Some(&cycle_id),
                &Event::CycleFailed {
                    day,
                    error: message,
                },
            )?;

            let router = NotificationRouter::with_default_providers();
            let outcomes = router
                .send_failure(&FailureContext {
                    device_id: &config.device_id,
                    cycle_id: &cycle_id,
                    day,
                    run_date: &today(),
                })
                .await;
            append_notification_events(&repo, &cycle_id, &outcomes)?;

            Err(err)
        }
    }
}

async fn terminate(
    config: &RuntimeConfig,
    repo: &Repository,
    state: &mut DeviceState,
    mission_text: &str,
    cycle_id: &str,
    day: u32,
    human_message: &str,
) -> Result<TickResult, TickError> {
    info!(%cycle_id, "human termination command received");
    repo.append_event(
        Some(cycle_id),
        &Event::HumanCommandTerminate {
            preview: preview(human_message),
        },
    )?;

    state.status = StateStatus::Terminated;
    state.purpose.becoming = CLOSING_BECOMING.to_string();
    state.last_summary = CLOSING_SUMMARY.to_string();
    state.day = day;
    repo.save_state(state)?;

    let run_date = today();
    let status = build_public_status(&StatusInputs {
        device_id: &config.device_id,
        cycle_id,
        day,
        state,
        worker_status: "TERMINATED",
        mission_text,
        summary_hint: CLOSING_SUMMARY,
        objective_hint: "",
    });
    repo.save_public_status(&status)?;
    let markdown = build_public_daily_summary(&status, "", CLOSING_SUMMARY);
    repo.save_public_daily_summary(day, &run_date, &markdown)?;

    let session_path = repo.save_session_record(&SessionRecord {
        date: run_date.clone(),
        cycle_id: cycle_id.to_string(),
        day,
        status: state.status,
        summary: state.last_summary.clone(),
        work_order_path: None,
        worker_result_path: None,
        worker_status: "TERMINATED".to_string(),
    })?;

    let git = commit_device_changes(
        &config.paths.project_root,
        &config.device_id,
        day,
        &state.status.to_string(),
    )
    .await;

    let router = NotificationRouter::with_default_providers();
    let outcomes = router
        .send_cycle(&CycleContext {
            status: &status,
            git: &git,
            run_date: &run_date,
        })
        .await;
    append_notification_events(repo, cycle_id, &outcomes)?;

    repo.append_event(
        Some(cycle_id),
        &Event::CycleCompleted {
            day,
            status: state.status,
            git: git.clone(),
        },
    )?;

    Ok(TickResult {
        skipped: false,
        device_id: config.device_id.clone(),
        cycle_id: Some(cycle_id.to_string()),
        day,
        status: state.status,
        summary: Some(state.last_summary.clone()),
        session_path: Some(session_path.display().to_string()),
        git: Some(git),
    })
}

async fn run_cycle(
    config: &RuntimeConfig,
    repo: &Repository,
    state: &mut DeviceState,
    mission_text: &str,
    cycle_id: &str,
    day: u32,
) -> Result<TickResult, TickError> {
    let runner = OsCommandRunner;
    let hardware_events =
        probe_hardware_requests(state, &runner, adapter_env::hw_command_timeout()).await;
    for event in &hardware_events {
        repo.append_event(Some(cycle_id), event)?;
    }

    let result_path = repo.worker_result_path(cycle_id);
    let allowed_paths = vec![
        config.paths.project_root.display().to_string(),
        repo.paths().device_dir.display().to_string(),
    ];

    let plan = plan_work_order(
        state,
        &config.device_id,
        cycle_id,
        mission_text,
        &result_path.display().to_string(),
        allowed_paths,
    );
    let work_order_path = repo.save_work_order(&plan.work_order)?;
    for event in &plan.events {
        repo.append_event(Some(cycle_id), event)?;
    }
    repo.save_state(state)?;

    let (worker_result, run_metadata) = execute_work_order(
        &plan.work_order,
        &config.paths.project_root,
        adapter_env::codex_timeout(),
    )
    .await?;
    repo.save_worker_result(&worker_result)?;

    repo.append_event(
        Some(cycle_id),
        &Event::WorkerExecuted {
            returncode: run_metadata.returncode,
            mode: run_metadata.mode.clone(),
        },
    )?;

    let mut worker_result = worker_result;
    if let Some(event) = reject_worker_becoming(&mut worker_result, mission_text, day) {
        repo.append_event(Some(cycle_id), &event)?;
    }

    let reducer_events = apply_worker_result(state, &worker_result);
    for event in &reducer_events {
        repo.append_event(Some(cycle_id), event)?;
    }

    state.day = day;
    repo.save_state(state)?;

    let run_date = today();
    let worker_status = worker_result.status.to_string();
    let status = build_public_status(&StatusInputs {
        device_id: &config.device_id,
        cycle_id,
        day,
        state,
        worker_status: &worker_status,
        mission_text,
        summary_hint: &state.last_summary,
        objective_hint: &plan.work_order.objective,
    });
    repo.save_public_status(&status)?;
    let markdown =
        build_public_daily_summary(&status, &plan.work_order.objective, &state.last_summary);
    repo.save_public_daily_summary(day, &run_date, &markdown)?;

    let session_path = repo.save_session_record(&SessionRecord {
        date: run_date.clone(),
        cycle_id: cycle_id.to_string(),
        day,
        status: state.status,
        summary: state.last_summary.clone(),
        work_order_path: Some(work_order_path.display().to_string()),
        worker_result_path: Some(result_path.display().to_string()),
        worker_status: worker_status.clone(),
    })?;

    let git = commit_device_changes(
        &config.paths.project_root,
        &config.device_id,
        day,
        &state.status.to_string(),
    )
    .await;

    let router = NotificationRouter::with_default_providers();
    let outcomes = router
        .send_cycle(&CycleContext {
            status: &status,
            git: &git,
            run_date: &run_date,
        })
        .await;
    append_notification_events(repo, cycle_id, &outcomes)?;

    repo.append_event(
        Some(cycle_id),
        &Event::CycleCompleted {
            day,
            status: state.status,
            git: git.clone(),
        },
    )?;

    info!(%cycle_id, day, status = %state.status, "cycle completed");

    Ok(TickResult {
        skipped: false,
        device_id: config.device_id.clone(),
        cycle_id: Some(cycle_id.to_string()),
        day,
        status: state.status,
        summary: Some(state.last_summary.clone()),
        session_path: Some(session_path.display().to_string()),
        git: Some(git),
    })
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
