// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git commit/push adapter for per-device traces.
//!
//! Publication is best-effort: every failure is folded into the returned
//! [`GitOutcome`] instead of failing the cycle.

use crate::env;
use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;
use wdib_core::GitOutcome;

async fn git(project_root: &Path, args: &[&str], description: &str) -> Result<String, String> {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(project_root);
    let output = run_with_timeout(cmd, GIT_TIMEOUT, description).await?;
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(if stderr.is_empty() { stdout } else { stderr })
    }
}

fn short_id(device_id: &str) -> &str {
    device_id.get(..8).unwrap_or(device_id)
}

/// Stage and commit this device's subtree; optionally push.
pub async fn commit_device_changes(
    project_root: &Path,
    device_id: &str,
    day: u32,
    status: &str,
) -> GitOutcome {
    if env::skip_git_commit() {
        return GitOutcome::skipped("Skipped git commit because WDIB_SKIP_GIT_COMMIT=true.");
    }

    let device_rel = format!("devices/{device_id}");

    if let Some(name) = env::git_user_name() {
        let _ = git(
            project_root,
            &["config", "user.name", name.as_str()],
            "git config",
        )
        .await;
    }
    if let Some(email) = env::git_user_email() {
        let _ = git(
            project_root,
            &["config", "user.email", email.as_str()],
            "git config",
        )
        .await;
    }

    if let Err(error) = git(project_root, &["add", device_rel.as_str()], "git add").await {
        return GitOutcome::skipped(format!("git add failed: {error}"));
    }

    let staged = match git(
        project_root,
        &["diff", "--cached", "--name-only", "--", device_rel.as_str()],
        "git diff",
    )
    .await
    {
        Ok(staged) => staged,
        Err(error) => return GitOutcome::skipped(format!("git diff failed: {error}")),
    };
    if staged.is_empty() {
        return GitOutcome::skipped("No device changes to commit.");
    }

    let message = format!("{} day {day:03} - {status}", short_id(device_id));
    if let Err(error) = git(
        project_root,
        &["commit", "-m", message.as_str(), "--", device_rel.as_str()],
        "git commit",
    )
    .await
    {
        return GitOutcome::skipped(format!("git commit failed: {error}"));
    }

    debug!(%message, "committed device changes");

    if !env::git_auto_push() {
        return GitOutcome {
            committed: true,
            pushed: false,
            message,
        };
    }

    let remote = env::git_remote();
    if git(
        project_root,
        &["remote", "get-url", remote.as_str()],
        "git remote get-url",
    )
    .await
    .is_err()
    {
        return GitOutcome {
            committed: true,
            pushed: false,
            message: format!("{message} (remote '{remote}' not configured)"),
        };
    }

    let push_target = env::git_branch().map(|branch| format!("HEAD:{branch}"));
    let mut push_args = vec!["push", remote.as_str()];
    if let Some(ref target) = push_target {
        push_args.push(target.as_str());
    }

    match git(project_root, &push_args, "git push").await {
        Ok(_) => GitOutcome {
            committed: true,
            pushed: true,
            message,
        },
        Err(error) => {
            let trimmed: String = error.chars().take(200).collect();
            GitOutcome {
                committed: true,
                pushed: false,
                message: format!("{message} (push failed: {trimmed})"),
            }
        }
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
