// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::notify::fake::{FakeNotifyProvider, NotifyCall};
use serial_test::serial;
use wdib_core::{PublicCounts, PublicStatus, StateStatus};

fn status_fixture() -> PublicStatus {
    PublicStatus {
        schema_version: "1.0".to_string(),
        device_id_short: "11111111".to_string(),
        cycle_id: "cycle-002-20260301T080000".to_string(),
        updated_at: "2026-03-01T08:00:00".to_string(),
        date: "2026-03-01".to_string(),
        first_awoke_on: "2026-03-01".to_string(),
        day: 2,
        status: StateStatus::Active,
        worker_status: "COMPLETED".to_string(),
        purpose: String::new(),
        becoming: String::new(),
        recent_activity: String::new(),
        system_profile: String::new(),
        completed_tasks: Vec::new(),
        next_tasks: Vec::new(),
        hardware_focus: Vec::new(),
        engineering_details: Vec::new(),
        self_observation: String::new(),
        counts: PublicCounts::default(),
        public_notice: String::new(),
    }
}

fn cycle_ctx<'a>(status: &'a PublicStatus, git: &'a GitOutcome) -> CycleContext<'a> {
    CycleContext {
        status,
        git,
        run_date: "2026-03-01",
    }
}

#[tokio::test]
#[serial]
async fn no_channels_means_no_outcomes() {
    std::env::remove_var("WDIB_NOTIFICATION_CHANNELS");
    let router = NotificationRouter::new(vec![Box::new(FakeNotifyProvider::new("fake"))]);
    let status = status_fixture();
    let git = GitOutcome::skipped("skip");
    assert!(router.send_cycle(&cycle_ctx(&status, &git)).await.is_empty());
}

#[tokio::test]
#[serial]
async fn unknown_channel_is_reported_as_unregistered() {
    std::env::set_var("WDIB_NOTIFICATION_CHANNELS", "pigeon");
    let router = NotificationRouter::new(vec![Box::new(FakeNotifyProvider::new("fake"))]);
    let status = status_fixture();
    let git = GitOutcome::skipped("skip");

    let outcomes = router.send_cycle(&cycle_ctx(&status, &git)).await;
    std::env::remove_var("WDIB_NOTIFICATION_CHANNELS");

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].sent);
    assert_eq!(
        outcomes[0].reason.as_deref(),
        Some("channel is not registered")
    );
}

#[tokio::test]
#[serial]
async fn unconfigured_channel_is_reported() {
    std::env::set_var("WDIB_NOTIFICATION_CHANNELS", "fake");
    let provider = FakeNotifyProvider::new("fake").unconfigured();
    let router = NotificationRouter::new(vec![Box::new(provider.clone())]);
    let status = status_fixture();
    let git = GitOutcome::skipped("skip");

    let outcomes = router.send_cycle(&cycle_ctx(&status, &git)).await;
    std::env::remove_var("WDIB_NOTIFICATION_CHANNELS");

    assert_eq!(
        outcomes[0].reason.as_deref(),
        Some("channel is not configured")
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
#[serial]
async fn provider_error_is_wrapped() {
    std::env::set_var("WDIB_NOTIFICATION_CHANNELS", "fake");
    let provider = FakeNotifyProvider::new("fake").failing("boom");
    let router = NotificationRouter::new(vec![Box::new(provider.clone())]);
    let status = status_fixture();
    let git = GitOutcome::skipped("skip");

    let outcomes = router.send_cycle(&cycle_ctx(&status, &git)).await;
    std::env::remove_var("WDIB_NOTIFICATION_CHANNELS");

    assert!(!outcomes[0].sent);
    let reason = outcomes[0].reason.as_deref().unwrap_or_default();
    assert!(reason.starts_with("channel notify failed:"), "{reason}");
    assert!(reason.contains("boom"));
}

#[tokio::test]
#[serial]
async fn successful_send_records_call_per_kind() {
    std::env::set_var("WDIB_NOTIFICATION_CHANNELS", "fake");
    let provider = FakeNotifyProvider::new("fake");
    let router = NotificationRouter::new(vec![Box::new(provider.clone())]);
    let status = status_fixture();
    let git = GitOutcome::skipped("skip");

    let cycle_outcomes = router.send_cycle(&cycle_ctx(&status, &git)).await;
    assert!(cycle_outcomes[0].sent);

    let failure_outcomes = router
        .send_failure(&FailureContext {
            device_id: "11111111-2222",
            cycle_id: "cycle-003-20260301T080000",
            day: 3,
            run_date: "2026-03-01",
        })
        .await;
    std::env::remove_var("WDIB_NOTIFICATION_CHANNELS");

    assert!(failure_outcomes[0].sent);
    assert_eq!(
        provider.calls(),
        vec![
            NotifyCall::Cycle {
                cycle_id: "cycle-002-20260301T080000".to_string()
            },
            NotifyCall::Failure {
                cycle_id: "cycle-003-20260301T080000".to_string()
            },
        ]
    );
}
