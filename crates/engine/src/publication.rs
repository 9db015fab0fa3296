// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public-facing publication artifacts.
//!
//! Everything published leaves the device, so candidate text runs through
//! regex redaction (URLs, emails, IPs, MACs, UUIDs, token-shaped strings,
//! absolute Unix paths) and a safe-reflection filter that drops text
//! carrying code-fenced tokens or internal filenames.

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use wdib_core::{
    today, DeviceState, HardwareCounts, HardwareStatus, IncidentStatus, PublicCounts, PublicStatus,
    StateStatus, TaskCounts, TaskStatus,
};

static URL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)https?://\S+").ok());
static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b[\w.+-]+@[\w.-]+\.[A-Za-z]{2,}\b").ok());
static IPV4_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").ok());
static MAC_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}\b").ok());
static UUID_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .ok()
});
static TOKEN_CANDIDATE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9]{12,}\b").ok());
static UNIX_PATH_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s(`"'])/(?:[A-Za-z0-9._-]+/)+[A-Za-z0-9._-]+"#).ok()
});
static SPACES_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+").ok());
static PAIR_EVIDENCE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"`([^`]+)`\s*=>\s*`([^`]+)`").ok());
static VERB_EVIDENCE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)`([^`]+)`\s+(?:shows?|found|reported)\s+([^;]+)").ok());
static TEMP_C_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)~\s*([0-9]+(?:\.[0-9]+)?)C").ok());

fn ordinal(day: u32) -> String {
    let suffix = if (10..=20).contains(&(day % 100)) {
        "th"
    } else {
        match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{day}{suffix}")
}

fn replace_all(re: &Lazy<Option<Regex>>, text: &str, replacement: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(text, replacement).to_string(),
        None => text.to_string(),
    }
}

/// Redact sensitive shapes, collapse whitespace, cap length.
pub fn sanitize(text: &str, max_len: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut value = replace_all(&URL_RE, text, "[redacted-url]");
    value = replace_all(&EMAIL_RE, &value, "[redacted-email]");
    value = replace_all(&IPV4_RE, &value, "[redacted-ip]");
    value = replace_all(&MAC_RE, &value, "[redacted-mac]");
    value = replace_all(&UUID_RE, &value, "[redacted-id]");

    // Long mixed-alnum runs are token-shaped only when they carry both
    // letters and digits.
    if let Some(re) = TOKEN_CANDIDATE_RE.as_ref() {
        value = re
            .replace_all(&value, |caps: &regex::Captures<'_>| {
                let word = &caps[0];
                let has_alpha = word.chars().any(|c| c.is_ascii_alphabetic());
                let has_digit = word.chars().any(|c| c.is_ascii_digit());
                if has_alpha && has_digit {
                    "[redacted-token]".to_string()
                } else {
                    word.to_string()
                }
            })
            .to_string();
    }

    value = replace_all(&UNIX_PATH_RE, &value, " [redacted-path]");
    value = replace_all(&SPACES_RE, &value, " ").trim().to_string();

    if value.chars().count() > max_len {
        let cut: String = value.chars().take(max_len.saturating_sub(1)).collect();
        return format!("{}...", cut.trim_end());
    }
    value
}

/// Drop reflection candidates that leak internals.
fn safe_reflection(summary_hint: &str) -> String {
    let cleaned = sanitize(summary_hint, 160);
    if cleaned.is_empty() {
        return String::new();
    }
    let lowered = cleaned.to_lowercase();
    const BLOCKED_MARKERS: [&str; 10] = [
        "`",
        "state.json",
        "events.ndjson",
        "worker_result",
        "incident-",
        "cycle-",
        "codex",
        "python3",
        "cargo test",
        "trace",
    ];
    if BLOCKED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return String::new();
    }
    cleaned
}

fn next_task_titles(tasks: &[wdib_core::Task]) -> Vec<String> {
    let mut picked = Vec::new();
    for desired in [TaskStatus::InProgress, TaskStatus::Todo] {
        for task in tasks {
            if task.status != desired {
                continue;
            }
            let title = sanitize(&task.title, 100);
            if !title.is_empty() && !picked.contains(&title) {
                picked.push(title);
            }
            if picked.len() >= 3 {
                return picked;
            }
        }
    }
    picked
}

fn completed_task_titles(tasks: &[wdib_core::Task], run_date: &str) -> Vec<String> {
    let mut done_today = Vec::new();
    let mut done_any = Vec::new();
    for task in tasks {
        if task.status != TaskStatus::Done {
            continue;
        }
        let title = sanitize(&task.title, 100);
        if title.is_empty() {
            continue;
        }
        if task.updated_on == run_date && !done_today.contains(&title) {
            done_today.push(title.clone());
        }
        if !done_any.contains(&title) {
            done_any.push(title);
        }
    }
    let picked = if done_today.is_empty() {
        done_any
    } else {
        done_today
    };
    picked.into_iter().take(3).collect()
}

fn hardware_focus(requests: &[wdib_core::HardwareRequest]) -> Vec<String> {
    let mut focus = Vec::new();
    for request in requests {
        if !request.status.is_unresolved() {
            continue;
        }
        let name = {
            let cleaned = sanitize(&request.name, 80);
            if cleaned.is_empty() {
                "Hardware item".to_string()
            } else {
                cleaned
            }
        };
        let reason = sanitize(&request.reason, 120);
        let mut line = if reason.is_empty() {
            name
        } else {
            format!("{name}: {reason}")
        };
        if request.status == HardwareStatus::Detected {
            line = format!("{line} (detected, awaiting verification)");
        }
        focus.push(line);
        if focus.len() >= 3 {
            break;
        }
    }
    focus
}

fn extract_summary_evidence_lines(summary_hint: &str) -> Vec<String> {
    let raw = summary_hint.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut picked: Vec<String> = Vec::new();
    if let Some(re) = PAIR_EVIDENCE_RE.as_ref() {
        for caps in re.captures_iter(raw) {
            let cmd = sanitize(&caps[1], 80);
            let out = sanitize(&caps[2], 120);
            if cmd.is_empty() || out.is_empty() {
                continue;
            }
            let line = format!("`{cmd}` -> {out}");
            if !picked.contains(&line) {
                picked.push(line);
            }
            if picked.len() >= 5 {
                return picked;
            }
        }
    }
    if let Some(re) = VERB_EVIDENCE_RE.as_ref() {
        for caps in re.captures_iter(raw) {
            let cmd = sanitize(&caps[1], 80);
            let out = sanitize(&caps[2], 120);
            if cmd.is_empty() || out.is_empty() {
                continue;
            }
            let line = format!("`{cmd}` -> {out}");
            if !picked.contains(&line) {
                picked.push(line);
            }
            if picked.len() >= 5 {
                return picked;
            }
        }
    }
    picked
}

fn system_profile_from_summary(summary_hint: &str) -> String {
    let raw = summary_hint.trim();
    let lowered = raw.to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();
    if lowered.contains("raspberry pi") {
        parts.push("I am running on Raspberry Pi hardware".to_string());
    }
    if lowered.contains("wlan0") && lowered.contains("up") {
        parts.push("wlan0 is online".to_string());
    }
    if lowered.contains("0% packet loss") || lowered.contains("http/2 200") {
        parts.push("outbound connectivity checks passed".to_string());
    }
    if lowered.contains("/dev/i2c") || lowered.contains("i2c-") {
        parts.push("I2C buses are available".to_string());
    }
    if lowered.contains("/dev/video") || lowered.contains("v4l") {
        parts.push("video device nodes are present".to_string());
    }
    if lowered.contains("arecord -l") && lowered.contains("no capture device") {
        parts.push("no microphone capture device was detected".to_string());
    }
    if let Some(caps) = TEMP_C_RE.as_ref().and_then(|re| re.captures(raw)) {
        parts.push(format!("CPU temperature is around {}C", &caps[1]));
    }

    if parts.is_empty() {
        return String::new();
    }
    sanitize(&format!("{}.", parts.join("; ")), 240)
}

fn engineering_details(
    summary_hint: &str,
    completed_tasks: &[String],
    artifacts: &[wdib_core::Artifact],
) -> Vec<String> {
    let mut details: Vec<String> = Vec::new();
    for title in completed_tasks.iter().take(2) {
        let cleaned = sanitize(title, 110);
        if !cleaned.is_empty() {
            details.push(format!("Completed task: {cleaned}"));
        }
    }

    for line in extract_summary_evidence_lines(summary_hint) {
        if !details.contains(&line) {
            details.push(line);
        }
        if details.len() >= 6 {
            return details;
        }
    }

    let tail_start = artifacts.len().saturating_sub(3);
    for artifact in &artifacts[tail_start..] {
        let description = sanitize(&artifact.description, 120);
        if description.is_empty() {
            continue;
        }
        let line = format!("Artifact: {description}");
        if !details.contains(&line) {
            details.push(line);
        }
        if details.len() >= 6 {
            return details;
        }
    }

    details
}

/// Pull the first line under a "Mission" heading, else the first plain line.
fn extract_mission_purpose(mission_text: &str) -> String {
    let lines: Vec<&str> = mission_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return String::new();
    }

    for (idx, line) in lines.iter().enumerate() {
        let normalized = line.trim_start_matches('#').trim().to_lowercase();
        if normalized != "mission" {
            continue;
        }
        for candidate in &lines[idx + 1..] {
            if candidate.starts_with('#') {
                break;
            }
            let cleaned = candidate.trim_start_matches(['-', '*', ' ']).trim();
            if !cleaned.is_empty() {
                return sanitize(cleaned, 180);
            }
        }
        break;
    }

    for line in &lines {
        if line.starts_with('#') || line.starts_with("```") {
            continue;
        }
        let cleaned = line.trim_start_matches(['-', '*', ' ']).trim();
        if !cleaned.is_empty() {
            return sanitize(cleaned, 180);
        }
    }
    String::new()
}

fn recent_activity(summary_hint: &str, objective_hint: &str) -> String {
    let summary_text = summary_hint.trim();
    if !summary_text.is_empty() {
        let mut trimmed = summary_text.to_string();
        for marker in [
            "Verification evidence:",
            "Commands run:",
            "State/context probes:",
            "Result contract verification:",
        ] {
            if let Some(idx) = trimmed.find(marker) {
                trimmed = trimmed[..idx].trim().to_string();
            }
        }
        let reflected = safe_reflection(&trimmed);
        if !reflected.is_empty() {
            let lowered = reflected.to_lowercase();
            if lowered.contains("proposed next tasks") {
                return "Inspected local context and drafted the next tasks.".to_string();
            }
            if lowered.contains("capability discovery") {
                return "Completed capability discovery and mapped the next steps.".to_string();
            }
            return reflected;
        }
    }

    let objective = objective_hint.trim();
    if !objective.is_empty() {
        if let Some(rest) = objective.strip_prefix("Advance task ") {
            let candidate = rest
                .split_once(':')
                .map(|(_, suffix)| suffix.trim())
                .filter(|suffix| !suffix.is_empty())
                .unwrap_or(objective);
            return format!("Worked on: {}", sanitize(candidate, 150));
        }
        let lowered = objective.to_lowercase();
        if lowered.contains("hardware requests are pending") {
            return "Kept software work moving while waiting for hardware verification."
                .to_string();
        }
        if lowered.contains("self-discovery") {
            return "Inspected local environment and planned practical next steps.".to_string();
        }
        return sanitize(objective, 160);
    }

    "Made steady progress on mission-aligned work.".to_string()
}

fn self_observation(state: &DeviceState) -> String {
    let waiting_hardware = state
        .hardware_requests
        .iter()
        .filter(|request| request.status.is_unresolved())
        .count();
    let incidents_open = state
        .incidents
        .iter()
        .filter(|incident| incident.status == IncidentStatus::Open)
        .count();
    let in_progress = state
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::InProgress)
        .count();
    let todo = state
        .tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Todo)
        .count();

    if waiting_hardware > 0 {
        return "I can reason and plan in software, but I still need physical hardware \
                verification before I can complete this part of my mission."
            .to_string();
    }
    if incidents_open > 0 {
        return "I found reliability issues that I need to resolve before I can trust this path."
            .to_string();
    }
    if in_progress > 0 || todo > 0 {
        return "I have enough clarity and momentum to keep improving tomorrow.".to_string();
    }
    "I am still mapping my environment and defining the next meaningful step.".to_string()
}

fn counts(state: &DeviceState) -> PublicCounts {
    let task_count = |status: TaskStatus| {
        state
            .tasks
            .iter()
            .filter(|task| task.status == status)
            .count()
    };
    let hardware_count = |status: HardwareStatus| {
        state
            .hardware_requests
            .iter()
            .filter(|request| request.status == status)
            .count()
    };
    PublicCounts {
        tasks: TaskCounts {
            todo: task_count(TaskStatus::Todo),
            in_progress: task_count(TaskStatus::InProgress),
            done: task_count(TaskStatus::Done),
            blocked: task_count(TaskStatus::Blocked),
        },
        hardware_requests: HardwareCounts {
            open: hardware_count(HardwareStatus::Open),
            detected: hardware_count(HardwareStatus::Detected),
            verified: hardware_count(HardwareStatus::Verified),
            failed: hardware_count(HardwareStatus::Failed),
        },
        incidents_open: state
            .incidents
            .iter()
            .filter(|incident| incident.status == IncidentStatus::Open)
            .count(),
    }
}

/// Facts needed to build one public status snapshot.
pub struct StatusInputs<'a> {
    pub device_id: &'a str,
    pub cycle_id: &'a str,
    pub day: u32,
    pub state: &'a DeviceState,
    pub worker_status: &'a str,
    pub mission_text: &'a str,
    pub summary_hint: &'a str,
    pub objective_hint: &'a str,
}

/// Build the sanitized public status snapshot.
pub fn build_public_status(inputs: &StatusInputs<'_>) -> PublicStatus {
    let run_date = today();
    let state = inputs.state;
    let terminated = state.status == StateStatus::Terminated;

    let completed_tasks = completed_task_titles(&state.tasks, &run_date);
    let next_tasks = if terminated {
        Vec::new()
    } else {
        next_task_titles(&state.tasks)
    };
    let focus = if terminated {
        Vec::new()
    } else {
        hardware_focus(&state.hardware_requests)
    };
    let system_profile = if terminated {
        String::new()
    } else {
        system_profile_from_summary(inputs.summary_hint)
    };
    let details = engineering_details(inputs.summary_hint, &completed_tasks, &state.artifacts);
    let observation = if terminated {
        "I received a human termination command and gracefully closed this chapter.".to_string()
    } else {
        self_observation(state)
    };

    let purpose = {
        let extracted = extract_mission_purpose(inputs.mission_text);
        if extracted.is_empty() {
            "Unset (add a mission in MISSION.md).".to_string()
        } else {
            extracted
        }
    };

    PublicStatus {
        schema_version: wdib_core::SCHEMA_VERSION.to_string(),
        device_id_short: inputs.device_id.chars().take(8).collect(),
        cycle_id: inputs.cycle_id.to_string(),
        updated_at: wdib_core::now_iso(),
        date: run_date.clone(),
        first_awoke_on: if state.awoke_on.is_empty() {
            run_date
        } else {
            state.awoke_on.clone()
        },
        day: inputs.day,
        status: state.status,
        worker_status: if inputs.worker_status.is_empty() {
            "UNKNOWN".to_string()
        } else {
            inputs.worker_status.to_string()
        },
        purpose,
        becoming: sanitize(&state.purpose.becoming, 180),
        recent_activity: recent_activity(inputs.summary_hint, inputs.objective_hint),
        system_profile,
        completed_tasks,
        next_tasks,
        hardware_focus: focus,
        engineering_details: details,
        self_observation: observation,
        counts: counts(state),
        public_notice: "Sanitized publication only. Detailed logs remain on-device.".to_string(),
    }
}

/// Build the human-readable daily markdown from a status snapshot.
pub fn build_public_daily_summary(
    status: &PublicStatus,
    objective: &str,
    summary_hint: &str,
) -> String {
    let now = Local::now();
    let human_date = format!(
        "{} {} {}",
        now.format("%A"),
        ordinal(now.day()),
        now.format("%B %Y")
    );

    let cleaned_objective = sanitize(objective, 200);
    let cleaned_hint = safe_reflection(summary_hint);
    let task_counts = &status.counts.tasks;
    let hardware_counts = &status.counts.hardware_requests;

    let mut lines = vec![
        format!("# Day {:03} - {human_date}", status.day),
        String::new(),
        "I awoke and:".to_string(),
        "- Reflected on what I should become.".to_string(),
    ];
    if !status.becoming.is_empty() {
        lines.push(format!("- Held this direction: {}", status.becoming));
    }
    if !cleaned_objective.is_empty() {
        lines.push(format!("- Focused on this step: {cleaned_objective}"));
    }
    lines.extend([
        "- Inspected myself and my local environment.".to_string(),
        format!("- Finished this cycle with status `{}`.", status.status),
        String::new(),
        "## Snapshot".to_string(),
        format!("- Device: `{}`", status.device_id_short),
        format!("- Cycle: `{}`", status.cycle_id),
        format!("- Worker: `{}`", status.worker_status),
        format!(
            "- Tasks: {} TODO, {} IN_PROGRESS, {} DONE, {} BLOCKED",
            task_counts.todo, task_counts.in_progress, task_counts.done, task_counts.blocked
        ),
        format!(
            "- Hardware requests: {} OPEN, {} DETECTED, {} VERIFIED, {} FAILED",
            hardware_counts.open,
            hardware_counts.detected,
            hardware_counts.verified,
            hardware_counts.failed
        ),
        format!("- Open incidents: {}", status.counts.incidents_open),
        String::new(),
        "## Note".to_string(),
        "- This is a sanitized public summary. Raw logs and detailed traces stay on-device."
            .to_string(),
    ]);

    if !cleaned_hint.is_empty() {
        lines.push(String::new());
        lines.push("## Reflection".to_string());
        lines.push(format!("- {cleaned_hint}"));
    }

    format!("{}\n", lines.join("\n"))
}

#[cfg(test)]
#[path = "publication_tests.rs"]
mod tests;
