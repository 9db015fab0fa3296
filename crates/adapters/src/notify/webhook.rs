// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incoming-webhook notification provider.
//!
//! Posts a formatted message per cycle. Composition prefers an
//! LLM-authored text when an API key is available and falls back to
//! rule-based templates keyed on message type (awakening / update /
//! terminate). Markdown bold is normalized to Slack-style mrkdwn.

use super::{CycleContext, FailureContext, NotifyError, NotifyProvider};
use crate::env;
use crate::extract::extract_json_object;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use wdib_core::{parse_iso_date, PublicStatus, StateStatus};

const LLM_TIMEOUT: Duration = Duration::from_secs(30);
const LLM_ENDPOINT: &str = "https://api.openai.com/v1/responses";

// Slack bold is *text*, not **text** or __text__.
static DOUBLE_ASTERISK_BOLD_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\*\*(\S(?s:.*?\S)?)\*\*").ok());
static DOUBLE_UNDERSCORE_BOLD_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"__(\S(?s:.*?\S)?)__").ok());

/// Convert common Markdown variants into Slack mrkdwn equivalents.
pub fn normalize_mrkdwn(text: &str) -> String {
    let mut value = text.trim().to_string();
    if let Some(re) = DOUBLE_ASTERISK_BOLD_RE.as_ref() {
        value = re.replace_all(&value, "*$1*").to_string();
    }
    if let Some(re) = DOUBLE_UNDERSCORE_BOLD_RE.as_ref() {
        value = re.replace_all(&value, "*$1*").to_string();
    }
    value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageType {
    Awakening,
    Update,
    Terminate,
}

fn message_type(status: &PublicStatus) -> MessageType {
    if status.status == StateStatus::Terminated || status.worker_status == "TERMINATED" {
        return MessageType::Terminate;
    }
    if status.day <= 1 {
        MessageType::Awakening
    } else {
        MessageType::Update
    }
}

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

fn human_date(run_date: &str) -> String {
    match parse_iso_date(run_date) {
        Some(date) => {
            use chrono::Datelike;
            format!(
                "{} {} {}",
                date.format("%A"),
                ordinal(date.day()),
                date.format("%B")
            )
        }
        None => run_date.to_string(),
    }
}

fn cycle_heading(status: &PublicStatus, run_date: &str) -> String {
    let kind = message_type(status);
    if kind == MessageType::Terminate {
        return String::new();
    }

    let day_label = if status.day > 0 {
        format!("DAY {}", status.day)
    } else {
        "DAY ?".to_string()
    };
    let (day_label, icon) = match kind {
        MessageType::Awakening => (format!("{day_label}: Awakening"), env::webhook_awakening_emoji()),
        _ => (day_label, env::webhook_update_emoji()),
    };
    format!("{icon} *{}: {day_label}*", human_date(run_date))
}

fn cycle_icon(status: &PublicStatus) -> Option<String> {
    match message_type(status) {
        MessageType::Terminate => None,
        MessageType::Awakening => Some(env::webhook_awakening_emoji()),
        MessageType::Update => Some(env::webhook_update_emoji()),
    }
}

fn bullet_lines(items: &[String], fallback: &str) -> Vec<String> {
    let cleaned: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    let source: Vec<&str> = if cleaned.is_empty() {
        vec![fallback]
    } else {
        cleaned
    };
    source
        .iter()
        .take(3)
        .map(|item| format!("• {item}"))
        .collect()
}

fn engineering_detail_lines(status: &PublicStatus) -> Vec<String> {
    status
        .engineering_details
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .take(5)
        .collect()
}

fn build_awakening_text(status: &PublicStatus, run_date: &str) -> String {
    let mut lines = vec![cycle_heading(status, run_date), String::new()];

    if status.system_profile.is_empty() {
        lines.push("Explored myself and mapped my local hardware/software baseline.".to_string());
    } else {
        lines.push(format!("Explored myself. {}", status.system_profile));
    }
    if !status.recent_activity.is_empty() {
        lines.push(format!("What I did: {}", status.recent_activity));
    }
    if !status.becoming.is_empty() {
        lines.push(format!("I've reviewed my mission: {}", status.becoming));
    } else if !status.purpose.is_empty() {
        lines.push(format!("I've reviewed my mission: {}", status.purpose));
    }
    if !status.self_observation.is_empty() {
        lines.push(format!(
            "What I learned about myself: {}",
            status.self_observation
        ));
    }

    lines.push(String::new());
    lines.push("What's next:".to_string());
    lines.extend(bullet_lines(
        &status.next_tasks,
        "Continue local inspection and propose the first concrete task.",
    ));

    let details = engineering_detail_lines(status);
    if !details.is_empty() {
        lines.push(String::new());
        lines.push("Engineering details:".to_string());
        lines.extend(details);
    }
    lines.join("\n")
}

fn build_update_text(status: &PublicStatus, run_date: &str) -> String {
    let mut lines = vec![cycle_heading(status, run_date), String::new()];

    lines.push("*What I did*".to_string());
    if status.recent_activity.is_empty() {
        lines.push("What I did: Kept momentum on mission-aligned tasks.".to_string());
    } else {
        lines.push(format!("What I did: {}", status.recent_activity));
    }
    for title in status.completed_tasks.iter().take(2) {
        lines.push(format!("Completed: {title}"));
    }
    if let Some(focus) = status.hardware_focus.first() {
        lines.push(format!("Hardware context: {focus}"));
    }

    lines.push(String::new());
    lines.push("*What I'm thinking*".to_string());
    if !status.becoming.is_empty() {
        lines.push(format!("Becoming: {}", status.becoming));
    } else if !status.purpose.is_empty() {
        lines.push(format!("Mission anchor: {}", status.purpose));
    }
    if !status.self_observation.is_empty() {
        lines.push(format!("Reflection: {}", status.self_observation));
    }

    let details = engineering_detail_lines(status);
    if !details.is_empty() {
        lines.push(String::new());
        lines.push("*Engineering notes*".to_string());
        lines.extend(details);
    }

    if !status.next_tasks.is_empty() {
        lines.push(String::new());
        lines.push("*What's next*".to_string());
        lines.extend(bullet_lines(
            &status.next_tasks,
            "Continue with current in-progress work.",
        ));
    }
    lines.join("\n")
}

fn build_terminate_text(status: &PublicStatus, run_date: &str) -> String {
    let mut lines = vec![
        format!(
            "*Closing journal - ✌️ {}, I've been told to terminate*",
            human_date(run_date)
        ),
        String::new(),
        "I've just received a human termination instruction and gracefully ended this run."
            .to_string(),
    ];
    if !status.recent_activity.is_empty() {
        lines.push(format!("Cycle context: {}", status.recent_activity));
    }

    lines.push(String::new());
    lines.push("Final thoughts:".to_string());
    if !status.completed_tasks.is_empty() {
        let completed: Vec<&str> = status
            .completed_tasks
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        lines.push(format!("We completed: {}.", completed.join("; ")));
    }
    let details = engineering_detail_lines(status);
    if !details.is_empty() {
        let highlights: Vec<&str> = details.iter().take(2).map(String::as_str).collect();
        lines.push(format!("Engineering highlights: {}.", highlights.join("; ")));
    }
    if !status.self_observation.is_empty() {
        lines.push(format!("I learned: {}", status.self_observation));
    } else if !status.becoming.is_empty() {
        lines.push(format!("I learned to stay anchored on: {}", status.becoming));
    } else if !status.purpose.is_empty() {
        lines.push(format!("I learned to stay anchored on: {}", status.purpose));
    }
    lines.push("I'm terminating now. Goodbye.".to_string());
    lines.join("\n")
}

fn build_cycle_text_rule_based(status: &PublicStatus, run_date: &str) -> String {
    match message_type(status) {
        MessageType::Terminate => build_terminate_text(status, run_date),
        MessageType::Awakening => build_awakening_text(status, run_date),
        MessageType::Update => build_update_text(status, run_date),
    }
}

fn build_failure_text(ctx: &FailureContext<'_>) -> String {
    let short_id = ctx.device_id.get(..8).unwrap_or(ctx.device_id);
    [
        format!("*WDIB Cycle Failed* ({})", ctx.run_date),
        format!("- Device: `{short_id}`"),
        format!("- Day: `{:03}`", ctx.day),
        format!("- Cycle: `{}`", ctx.cycle_id),
        "- Check device-local logs for details.".to_string(),
    ]
    .join("\n")
}

const LLM_SYSTEM_PROMPT: &str = "You are an expert at communicating your tasks for the day.\n\
You will be given facts for one autonomous engineering cycle and must produce a world-class update.\n\
You are writing an engineering journal focused on the software and hardware you build, and will build.\n\
Core task:\n\
- Provide an update focused on what you just completed.\n\
- Explain your thinking in relation to your core purpose.\n\
- Describe your recent work with concrete technical details; include command/tool evidence when present.\n\
- Include your state of mind with emotional intelligence grounded in your mission and ambitions.\n\
- Finish with upcoming tasks.\n\
Style:\n\
- Be concise where possible: short lists, notes, and direct language.\n\
Rules:\n\
1) Use only facts from the provided JSON context.\n\
2) Keep first-person voice ('I'). Be concrete, technical, and specific.\n\
3) Keep it concise but detailed: 140-320 words.\n\
4) Use Slack mrkdwn syntax. For bold use *text* (never **text**).\n\
5) Never mention internal schema names, secrets, IPs, tokens, or local paths.\n\
6) If message_type is 'terminate', write a graceful closing note that reflects on your full lifecycle because this is your final message.\n\
Return strict JSON with one key: text.";

fn llm_prompt_context(ctx: &CycleContext<'_>) -> Value {
    let status = ctx.status;
    let kind = match message_type(status) {
        MessageType::Awakening => "awakening",
        MessageType::Update => "update",
        MessageType::Terminate => "terminate",
    };
    let device_summary = if status.system_profile.is_empty() {
        format!("Device ID {}", status.device_id_short)
    } else {
        status.system_profile.clone()
    };
    json!({
        "message_type": kind,
        "device_id_short": status.device_id_short,
        "device_summary": device_summary,
        "run_date": human_date(ctx.run_date),
        "cycle_id": status.cycle_id,
        "day": status.day,
        "status": status.status,
        "worker_status": status.worker_status,
        "purpose": status.purpose,
        "becoming": status.becoming,
        "recent_activity": status.recent_activity,
        "system_profile": status.system_profile,
        "self_observation": status.self_observation,
        "completed_tasks": status.completed_tasks.iter().take(3).collect::<Vec<_>>(),
        "next_tasks": status.next_tasks.iter().take(3).collect::<Vec<_>>(),
        "hardware_focus": status.hardware_focus.iter().take(3).collect::<Vec<_>>(),
        "engineering_details": engineering_detail_lines(status),
        "counts": status.counts,
        "git_pushed": ctx.git.pushed,
    })
}

/// Webhook notification provider.
pub struct WebhookProvider {
    client: reqwest::Client,
}

impl WebhookProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// LLM-authored message text; `None` falls back to templates.
    async fn compose_llm(&self, ctx: &CycleContext<'_>) -> Option<String> {
        let api_key = env::openai_api_key()?;
        let context = llm_prompt_context(ctx);
        let user_prompt = format!(
            "Compose a polished cycle update.\nContext JSON:\n{}",
            serde_json::to_string_pretty(&context).ok()?
        );
        let body = json!({
            "model": env::llm_model(),
            "input": [
                {"role": "system", "content": [{"type": "input_text", "text": LLM_SYSTEM_PROMPT}]},
                {"role": "user", "content": [{"type": "input_text", "text": user_prompt}]}
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": "wdib_cycle_message",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["text"],
                        "properties": {
                            "text": {"type": "string", "minLength": 1, "maxLength": 1800}
                        }
                    }
                }
            }
        });

        let response = self
            .client
            .post(LLM_ENDPOINT)
            .bearer_auth(api_key)
            .timeout(LLM_TIMEOUT)
            .json(&body)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "LLM compose request rejected");
            return None;
        }
        let payload: Value = response.json().await.ok()?;

        // Responses API: concatenate output[].content[] entries of type
        // "output_text".
        let mut output_text = String::new();
        for item in payload.get("output").and_then(Value::as_array)? {
            let Some(content) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for entry in content {
                if entry.get("type").and_then(Value::as_str) == Some("output_text") {
                    if let Some(text) = entry.get("text").and_then(Value::as_str) {
                        output_text.push_str(text);
                    }
                }
            }
        }

        let parsed = extract_json_object(&output_text)?;
        let text = parsed.get("text")?.as_str()?.trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    async fn build_cycle_text(&self, ctx: &CycleContext<'_>) -> String {
        if let Some(llm_text) = self.compose_llm(ctx).await {
            let heading = cycle_heading(ctx.status, ctx.run_date);
            if heading.is_empty() {
                return llm_text;
            }
            return format!("{heading}\n\n{llm_text}");
        }
        build_cycle_text_rule_based(ctx.status, ctx.run_date)
    }

    async fn post_text(&self, text: &str, icon_emoji: Option<String>) -> Result<(), NotifyError> {
        let url = env::webhook_url().ok_or_else(|| {
            NotifyError::SendFailed("WDIB_WEBHOOK_URL is not configured".to_string())
        })?;

        let mut payload = json!({"text": normalize_mrkdwn(text)});
        if let Some(username) = env::webhook_username() {
            payload["username"] = Value::String(username);
        }
        if let Some(icon) = icon_emoji.filter(|icon| !icon.is_empty()) {
            payload["icon_emoji"] = Value::String(icon);
        }

        let response = self
            .client
            .post(url)
            .timeout(env::webhook_timeout())
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifyError::SendFailed(format!("webhook request failed: {err}")))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(NotifyError::SendFailed(format!(
                "unexpected response status {status}"
            )));
        }
        Ok(())
    }
}

impl Default for WebhookProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifyProvider for WebhookProvider {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn is_configured(&self) -> bool {
        env::webhook_url().is_some()
    }

    async fn notify_cycle(&self, ctx: &CycleContext<'_>) -> Result<(), NotifyError> {
        let text = self.build_cycle_text(ctx).await;
        self.post_text(&text, cycle_icon(ctx.status)).await
    }

    async fn notify_failure(&self, ctx: &FailureContext<'_>) -> Result<(), NotifyError> {
        let text = build_failure_text(ctx);
        self.post_text(&text, Some(env::webhook_update_emoji()))
            .await
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
