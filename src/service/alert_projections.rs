// src/service/alert_projections.rs
//! Read-only views derived from a registry snapshot.
//!
//! Every function takes alerts in registry order (newest first) and recomputes
//! from scratch; nothing here is cached.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::model::alert::{Alert, AlertStatus, AlertType};

/// Number of alerts whose status is `active`.
pub fn active_count<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> usize {
    alerts.into_iter().filter(|a| a.is_active()).count()
}

/// Number of critical alerts, regardless of status.
pub fn critical_count<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> usize {
    alerts.into_iter().filter(|a| a.is_critical()).count()
}

/// First `n` alerts in registry order; all of them if fewer exist.
pub fn recent<'a>(alerts: impl IntoIterator<Item = &'a Alert>, n: usize) -> Vec<Alert> {
    alerts.into_iter().take(n).cloned().collect()
}

/// Most recent alert raised at `location`, if any.
pub fn last_alert_for<'a>(
    alerts: impl IntoIterator<Item = &'a Alert>,
    location: &str,
) -> Option<&'a Alert> {
    alerts.into_iter().find(|a| a.location() == location)
}

/// Counters shown on the farmer dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub active: usize,
    pub investigating: usize,
    pub resolved: usize,
    pub critical: usize,
    pub by_type: BTreeMap<AlertType, usize>,
}

pub fn summarize<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    for alert in alerts {
        summary.total += 1;
        match alert.status() {
            AlertStatus::Active => summary.active += 1,
            AlertStatus::Investigating => summary.investigating += 1,
            AlertStatus::Resolved => summary.resolved += 1,
        }
        if alert.is_critical() {
            summary.critical += 1;
        }
        *summary.by_type.entry(alert.alert_type()).or_default() += 1;
    }
    summary
}

/// What the notification panel renders: the full feed plus its footer counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationDigest {
    pub entries: Vec<Alert>,
    pub active: usize,
    pub critical: usize,
}

pub fn notification_digest<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> NotificationDigest {
    let entries: Vec<Alert> = alerts.into_iter().cloned().collect();
    NotificationDigest {
        active: active_count(&entries),
        critical: critical_count(&entries),
        entries,
    }
}
