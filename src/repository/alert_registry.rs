// src/repository/alert_registry.rs
//! Alert registry: the single, process-lifetime store of alerts.
//!
//! This module provides:
//! - `AlertRegistry`, an ordered in-memory store (newest first) guarded by one `RwLock`.
//! - Status transitions serialized with appends through the same lock.
//! - A `broadcast` subscription so consumers can react to changes, plus a
//!   `revision` counter for callers that prefer polling.
//! - Convenience projections that read through the lock on every call.
//!
//! Operations are synchronous and never await; the lock is held only for the
//! duration of a single mutation or read.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::AlertingError;
use crate::domain::model::alert::{Alert, AlertStatus};
use crate::service::alert_projections::{self, DashboardSummary, NotificationDigest};
use crate::telemetry::metrics::{ALERTS_ACTIVE, ALERTS_APPENDED, ALERTS_CRITICAL, STATUS_REJECTIONS, STATUS_TRANSITIONS};

const EVENT_BUFFER: usize = 256;

/// Change notification published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Appended {
        id: Uuid,
        revision: u64,
    },
    StatusChanged {
        id: Uuid,
        from: AlertStatus,
        to: AlertStatus,
        revision: u64,
    },
}

impl RegistryEvent {
    pub fn revision(&self) -> u64 {
        match self {
            RegistryEvent::Appended { revision, .. } | RegistryEvent::StatusChanged { revision, .. } => *revision,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    // Stored oldest first; iterated in reverse to expose newest first.
    alerts: Vec<Alert>,
    positions: HashMap<Uuid, usize>,
    revision: u64,
    // Maintained on every mutation; reads and gauges never rescan.
    active: usize,
    critical: usize,
}

impl RegistryInner {
    fn newest_first(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().rev()
    }
}

pub struct AlertRegistry {
    inner: RwLock<RegistryInner>,
    events: broadcast::Sender<RegistryEvent>,
}

impl Default for AlertRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertRegistry {
    pub fn new() -> Self {
        let (events, _rx) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: RwLock::new(RegistryInner::default()),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an alert at the front. Only a colliding id is rejected.
    pub fn append(&self, alert: Alert) -> Result<Uuid, AlertingError> {
        let id = alert.id();
        let mut inner = self.write();
        if inner.positions.contains_key(&id) {
            warn!(alert_id = %id, "rejected alert with duplicate id");
            return Err(AlertingError::DuplicateAlertId(id));
        }
        info!(
            alert_id = %id,
            alert_type = %alert.alert_type(),
            severity = %alert.severity(),
            location = alert.location(),
            "alert appended"
        );
        let position = inner.alerts.len();
        inner.active += usize::from(alert.is_active());
        inner.critical += usize::from(alert.is_critical());
        inner.alerts.push(alert);
        inner.positions.insert(id, position);
        inner.revision += 1;
        metrics::increment_counter!(ALERTS_APPENDED);
        Self::publish_gauges(&inner);
        // Sent under the lock so subscribers see commit order.
        // No receivers is fine: nobody is watching yet.
        let _ = self.events.send(RegistryEvent::Appended {
            id,
            revision: inner.revision,
        });
        Ok(id)
    }

    /// Move an alert to `next`. Returns the previous status.
    pub fn set_status(&self, id: Uuid, next: AlertStatus) -> Result<AlertStatus, AlertingError> {
        let mut inner = self.write();
        let position = *inner.positions.get(&id).ok_or(AlertingError::AlertNotFound(id))?;
        let from = match inner.alerts[position].transition_to(next) {
            Ok(from) => from,
            Err(e) => {
                warn!(alert_id = %id, to = %next, error = %e, "status transition rejected");
                metrics::increment_counter!(STATUS_REJECTIONS);
                return Err(e);
            }
        };
        if from == AlertStatus::Active {
            inner.active -= 1;
        }
        if next == AlertStatus::Active {
            inner.active += 1;
        }
        inner.revision += 1;
        info!(alert_id = %id, %from, to = %next, "alert status changed");
        metrics::increment_counter!(STATUS_TRANSITIONS);
        Self::publish_gauges(&inner);
        let _ = self.events.send(RegistryEvent::StatusChanged {
            id,
            from,
            to: next,
            revision: inner.revision,
        });
        Ok(from)
    }

    fn publish_gauges(inner: &RegistryInner) {
        metrics::gauge!(ALERTS_ACTIVE, inner.active as f64);
        metrics::gauge!(ALERTS_CRITICAL, inner.critical as f64);
    }

    /// Snapshot of every alert, newest first. Mutating it does not touch the registry.
    pub fn all(&self) -> Vec<Alert> {
        self.read().newest_first().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Alert> {
        let inner = self.read();
        inner.positions.get(&id).map(|&p| inner.alerts[p].clone())
    }

    pub fn len(&self) -> usize {
        self.read().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().alerts.is_empty()
    }

    /// Bumped on every append and status change.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub fn active_count(&self) -> usize {
        self.read().active
    }

    pub fn critical_count(&self) -> usize {
        self.read().critical
    }

    pub fn recent(&self, n: usize) -> Vec<Alert> {
        alert_projections::recent(self.read().newest_first(), n)
    }

    pub fn last_alert_for(&self, location: &str) -> Option<Alert> {
        alert_projections::last_alert_for(self.read().newest_first(), location).cloned()
    }

    pub fn summary(&self) -> DashboardSummary {
        alert_projections::summarize(self.read().newest_first())
    }

    pub fn notification_digest(&self) -> NotificationDigest {
        alert_projections::notification_digest(self.read().newest_first())
    }
}
