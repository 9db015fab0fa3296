// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification channel routing.
//!
//! Channels are selected per run via `WDIB_NOTIFICATION_CHANNELS`; each
//! configured channel fans out independently and every outcome is reported
//! back so the runtime can record `NOTIFICATION_SENT|FAILED` events.

mod webhook;

pub use webhook::WebhookProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyProvider, NotifyCall};

use crate::env;
use async_trait::async_trait;
use thiserror::Error;
use wdib_core::{GitOutcome, PublicStatus};

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Facts available when announcing a completed cycle.
pub struct CycleContext<'a> {
    pub status: &'a PublicStatus,
    pub git: &'a GitOutcome,
    pub run_date: &'a str,
}

/// Facts available when announcing a failed cycle.
pub struct FailureContext<'a> {
    pub device_id: &'a str,
    pub cycle_id: &'a str,
    pub day: u32,
    pub run_date: &'a str,
}

/// One registered notification channel.
#[async_trait]
pub trait NotifyProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_configured(&self) -> bool;
    async fn notify_cycle(&self, ctx: &CycleContext<'_>) -> Result<(), NotifyError>;
    async fn notify_failure(&self, ctx: &FailureContext<'_>) -> Result<(), NotifyError>;
}

/// Per-channel fan-out result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel: String,
    pub sent: bool,
    pub reason: Option<String>,
}

impl ChannelOutcome {
    fn sent(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sent: true,
            reason: None,
        }
    }

    fn failed(channel: &str, reason: impl Into<String>) -> Self {
        Self {
            channel: channel.to_string(),
            sent: false,
            reason: Some(reason.into()),
        }
    }
}

/// Fans notifications out to every configured channel.
pub struct NotificationRouter {
    providers: Vec<Box<dyn NotifyProvider>>,
}

impl NotificationRouter {
    pub fn new(providers: Vec<Box<dyn NotifyProvider>>) -> Self {
        Self { providers }
    }

    /// Router with every production provider registered.
    pub fn with_default_providers() -> Self {
        Self::new(vec![Box::new(WebhookProvider::new())])
    }

    fn provider(&self, channel: &str) -> Option<&dyn NotifyProvider> {
        self.providers
            .iter()
            .find(|provider| provider.name() == channel)
            .map(AsRef::as_ref)
    }

    /// Announce a completed cycle on every configured channel.
    pub async fn send_cycle(&self, ctx: &CycleContext<'_>) -> Vec<ChannelOutcome> {
        let mut outcomes = Vec::new();
        for channel in env::notification_channels() {
            let Some(provider) = self.provider(&channel) else {
                outcomes.push(ChannelOutcome::failed(&channel, "channel is not registered"));
                continue;
            };
            if !provider.is_configured() {
                outcomes.push(ChannelOutcome::failed(&channel, "channel is not configured"));
                continue;
            }
            match provider.notify_cycle(ctx).await {
                Ok(()) => outcomes.push(ChannelOutcome::sent(&channel)),
                Err(error) => outcomes.push(ChannelOutcome::failed(
                    &channel,
                    format!("channel notify failed: {error}"),
                )),
            }
        }
        outcomes
    }

    /// Announce a failed cycle on every configured channel.
    pub async fn send_failure(&self, ctx: &FailureContext<'_>) -> Vec<ChannelOutcome> {
        let mut outcomes = Vec::new();
        for channel in env::notification_channels() {
            let Some(provider) = self.provider(&channel) else {
                outcomes.push(ChannelOutcome::failed(&channel, "channel is not registered"));
                continue;
            };
            if !provider.is_configured() {
                outcomes.push(ChannelOutcome::failed(&channel, "channel is not configured"));
                continue;
            }
            match provider.notify_failure(ctx).await {
                Ok(()) => outcomes.push(ChannelOutcome::sent(&channel)),
                Err(error) => outcomes.push(ChannelOutcome::failed(
                    &channel,
                    format!("channel notify failed: {error}"),
                )),
            }
        }
        outcomes
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod router_tests;
