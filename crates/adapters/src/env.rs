// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.
//!
//! Accessors are typed and carry their defaults; missing or malformed
//! values never error, they fall back.

use crate::worker::SandboxMode;
use std::time::Duration;

/// Truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
pub fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Integer env var with fallback on absence or parse failure.
pub fn env_int(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

// --- Worker (codex) ---

pub fn skip_codex() -> bool {
    env_bool("WDIB_SKIP_CODEX", false)
}

pub fn codex_model() -> Option<String> {
    env_string("WDIB_CODEX_MODEL")
}

pub fn codex_sandbox() -> SandboxMode {
    env_string("WDIB_CODEX_SANDBOX")
        .and_then(|raw| SandboxMode::parse(&raw))
        .unwrap_or(SandboxMode::WorkspaceWrite)
}

/// Worker timeout, floored at 60 seconds. Default 1200 s.
pub fn codex_timeout() -> Duration {
    Duration::from_secs(env_int("WDIB_CODEX_TIMEOUT_SECONDS", 1200).max(60) as u64)
}

pub fn codex_web_search_enabled() -> bool {
    env_bool("WDIB_CODEX_ENABLE_WEB_SEARCH", false)
}

// --- Hardware probes ---

/// Probe timeout, floored at 5 seconds. Default 20 s.
pub fn hw_command_timeout() -> Duration {
    Duration::from_secs(env_int("WDIB_HW_COMMAND_TIMEOUT_SECONDS", 20).max(5) as u64)
}

// --- Git ---

pub fn skip_git_commit() -> bool {
    env_bool("WDIB_SKIP_GIT_COMMIT", false)
}

pub fn git_auto_push() -> bool {
    env_bool("WDIB_GIT_AUTO_PUSH", true)
}

pub fn git_remote() -> String {
    env_string("WDIB_GIT_REMOTE").unwrap_or_else(|| "origin".to_string())
}

pub fn git_branch() -> Option<String> {
    env_string("WDIB_GIT_BRANCH")
}

pub fn git_user_name() -> Option<String> {
    env_string("WDIB_GIT_USER_NAME")
}

pub fn git_user_email() -> Option<String> {
    env_string("WDIB_GIT_USER_EMAIL")
}

// --- Notifications ---

/// Comma-separated channel names, lowercased, deduplicated, order kept.
pub fn notification_channels() -> Vec<String> {
    let raw = std::env::var("WDIB_NOTIFICATION_CHANNELS").unwrap_or_default();
    let mut names: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let name = part.trim().to_lowercase();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

pub fn webhook_url() -> Option<String> {
    env_string("WDIB_WEBHOOK_URL")
}

/// Webhook POST timeout. Default 8 s; non-positive values fall back.
pub fn webhook_timeout() -> Duration {
    let seconds = env_int("WDIB_WEBHOOK_TIMEOUT_SECONDS", 8);
    Duration::from_secs(if seconds > 0 { seconds as u64 } else { 8 })
}

pub fn webhook_username() -> Option<String> {
    env_string("WDIB_WEBHOOK_USERNAME")
}

pub fn webhook_icon_emoji() -> Option<String> {
    env_string("WDIB_WEBHOOK_ICON_EMOJI")
}

pub fn webhook_awakening_emoji() -> String {
    env_string("WDIB_WEBHOOK_AWAKENING_EMOJI")
        .or_else(webhook_icon_emoji)
        .unwrap_or_else(|| ":sunrise:".to_string())
}

pub fn webhook_update_emoji() -> String {
    env_string("WDIB_WEBHOOK_UPDATE_EMOJI")
        .or_else(webhook_icon_emoji)
        .unwrap_or_else(|| ":coffee:".to_string())
}

// --- LLM message composer ---

pub fn llm_model() -> String {
    env_string("WDIB_LLM_MODEL").unwrap_or_else(|| "gpt-5.2".to_string())
}

pub fn openai_api_key() -> Option<String> {
    env_string("OPENAI_API_KEY")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
