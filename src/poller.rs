//! Periodic polling and the last-known capability values
//!
//! [`CapabilityStore`] mirrors what the consuming layer shows: each poll
//! only touches values that changed, and a failed poll leaves every value
//! as it was.

use crate::capability::CapabilityId;
use crate::client::AlfenClient;
use crate::error::{AlfenError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::models::{CapabilityValue, CapabilityValueKind};
use crate::props::SocketIndex;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredValue {
    pub value: CapabilityValueKind,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CapabilityStore {
    values: HashMap<CapabilityId, StoredValue>,
    last_success: Option<DateTime<Utc>>,
    last_error: Option<String>,
    total_polls: u64,
    failed_polls: u64,
}

impl CapabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a poll result; returns the values that changed
    pub fn apply(&mut self, values: &[CapabilityValue]) -> Vec<CapabilityValue> {
        let now = Utc::now();
        self.total_polls = self.total_polls.saturating_add(1);
        self.last_success = Some(now);
        self.last_error = None;

        let mut changed = Vec::new();
        for v in values {
            if self.values.get(&v.capability).map(|s| &s.value) == Some(&v.value) {
                continue;
            }
            self.values.insert(
                v.capability,
                StoredValue {
                    value: v.value.clone(),
                    updated_at: now,
                },
            );
            changed.push(v.clone());
        }
        changed
    }

    /// Record a failed poll without touching any value
    pub fn record_failure(&mut self, error: &AlfenError) {
        self.total_polls = self.total_polls.saturating_add(1);
        self.failed_polls = self.failed_polls.saturating_add(1);
        self.last_error = Some(error.to_string());
    }

    pub fn get(&self, capability: CapabilityId) -> Option<&CapabilityValueKind> {
        self.values.get(&capability).map(|s| &s.value)
    }

    pub fn updated_at(&self, capability: CapabilityId) -> Option<DateTime<Utc>> {
        self.values.get(&capability).map(|s| s.updated_at)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    pub fn total_polls(&self) -> u64 {
        self.total_polls
    }

    pub fn failed_polls(&self) -> u64 {
        self.failed_polls
    }

    /// Current values keyed by capability name
    pub fn snapshot(&self) -> serde_json::Value {
        let values: serde_json::Map<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(cap, stored)| {
                (
                    cap.as_str().to_string(),
                    serde_json::to_value(&stored.value).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();
        serde_json::json!({
            "values": values,
            "last_success": self.last_success,
            "last_error": self.last_error,
            "total_polls": self.total_polls,
            "failed_polls": self.failed_polls,
        })
    }
}

/// Polls one socket at a fixed interval
pub struct Poller {
    client: Arc<AlfenClient>,
    socket: SocketIndex,
    period: Duration,
    store: CapabilityStore,
    logger: StructuredLogger,
}

impl Poller {
    pub fn new(client: Arc<AlfenClient>, socket: SocketIndex, period: Duration) -> Self {
        Self {
            client,
            socket,
            period,
            store: CapabilityStore::new(),
            logger: get_logger_with_context(LogContext::new("poller").with_socket(socket.as_u8())),
        }
    }

    pub fn store(&self) -> &CapabilityStore {
        &self.store
    }

    /// One poll cycle; returns the changed values
    pub async fn poll_once(&mut self) -> Result<Vec<CapabilityValue>> {
        match self.client.poll_actual_values(self.socket).await {
            Ok(values) => {
                let changed = self.store.apply(&values);
                self.logger.debug(&format!(
                    "Poll returned {} values, {} changed",
                    values.len(),
                    changed.len()
                ));
                Ok(changed)
            }
            Err(e) => {
                self.store.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Poll until `shutdown` resolves
    pub async fn run<F, C>(&mut self, shutdown: F, mut on_change: C)
    where
        F: Future<Output = ()>,
        C: FnMut(&[CapabilityValue]),
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(changed) if !changed.is_empty() => on_change(&changed),
                        Ok(_) => {}
                        Err(e) => self.logger.error(&format!("Poll cycle failed: {}", e)),
                    }
                }
                _ = &mut shutdown => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }
    }
}
