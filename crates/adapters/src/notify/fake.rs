// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notify provider for tests.

use super::{CycleContext, FailureContext, NotifyError, NotifyProvider};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCall {
    Cycle { cycle_id: String },
    Failure { cycle_id: String },
}

/// Scriptable provider that records every call.
#[derive(Clone)]
pub struct FakeNotifyProvider {
    name: &'static str,
    configured: bool,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<NotifyCall>>>,
}

impl FakeNotifyProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            configured: true,
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_with = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NotifyProvider for FakeNotifyProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn notify_cycle(&self, ctx: &CycleContext<'_>) -> Result<(), NotifyError> {
        self.calls.lock().push(NotifyCall::Cycle {
            cycle_id: ctx.status.cycle_id.clone(),
        });
        match &self.fail_with {
            Some(reason) => Err(NotifyError::SendFailed(reason.clone())),
            None => Ok(()),
        }
    }

    async fn notify_failure(&self, ctx: &FailureContext<'_>) -> Result<(), NotifyError> {
        self.calls.lock().push(NotifyCall::Failure {
            cycle_id: ctx.cycle_id.to_string(),
        });
        match &self.fail_with {
            Some(reason) => Err(NotifyError::SendFailed(reason.clone())),
            None => Ok(()),
        }
    }
}
