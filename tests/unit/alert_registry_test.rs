// tests/unit/alert_registry_test.rs

use std::sync::Arc;
use std::thread;

use chrono::Utc;

use biosecurity_alerting::{Alert, AlertRegistry, AlertStatus, AlertType, AlertingError, Severity};

fn sample_alert(alert_type: AlertType, severity: Severity, location: &str) -> Alert {
    Alert::new(alert_type, severity, "Sample alert", "Sample description", location, Utc::now())
}

#[test]
fn append_then_all_puts_new_alert_first() {
    let registry = AlertRegistry::new();
    for _ in 0..3 {
        registry.append(sample_alert(AlertType::Activity, Severity::Low, "Pen 3")).unwrap();
    }
    let before = registry.all().len();

    let id = registry
        .append(sample_alert(AlertType::Hygiene, Severity::Medium, "Block C"))
        .unwrap();

    let all = registry.all();
    assert_eq!(all.len(), before + 1);
    assert_eq!(all[0].id(), id);
}

#[test]
fn snapshot_is_detached_from_registry() {
    let registry = AlertRegistry::new();
    registry.append(sample_alert(AlertType::Health, Severity::High, "Coop A")).unwrap();

    let mut snapshot = registry.all();
    snapshot.clear();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.all().len(), 1);
}

#[test]
fn empty_registry_scenario_counts_critical_and_active() {
    let registry = AlertRegistry::new();
    assert!(registry.is_empty());

    registry
        .append(sample_alert(AlertType::Health, Severity::Critical, "Chicken Coop 1"))
        .unwrap();

    assert_eq!(registry.critical_count(), 1);
    assert_eq!(registry.active_count(), 1);
}

#[test]
fn resolved_alert_cannot_be_reopened() {
    let registry = AlertRegistry::new();
    let id = registry
        .append(sample_alert(AlertType::Hygiene, Severity::High, "Water Station"))
        .unwrap();

    assert_eq!(registry.set_status(id, AlertStatus::Resolved), Ok(AlertStatus::Active));

    let err = registry.set_status(id, AlertStatus::Active).unwrap_err();
    assert_eq!(
        err,
        AlertingError::InvalidTransition {
            id,
            from: AlertStatus::Resolved,
            to: AlertStatus::Active,
        }
    );
    assert_eq!(registry.get(id).unwrap().status(), AlertStatus::Resolved);
    assert_eq!(registry.active_count(), 0);
}

#[test]
fn investigating_then_resolved() {
    let registry = AlertRegistry::new();
    let id = registry
        .append(sample_alert(AlertType::Activity, Severity::Medium, "Pen 3, Block B"))
        .unwrap();

    registry.set_status(id, AlertStatus::Investigating).unwrap();
    assert_eq!(registry.active_count(), 0);
    assert!(registry.set_status(id, AlertStatus::Active).is_err());
    registry.set_status(id, AlertStatus::Resolved).unwrap();
    assert_eq!(registry.summary().resolved, 1);
}

#[test]
fn failed_transition_does_not_bump_revision() {
    let registry = AlertRegistry::new();
    let id = registry.append(sample_alert(AlertType::Health, Severity::Low, "Nursery 1")).unwrap();
    registry.set_status(id, AlertStatus::Resolved).unwrap();
    let revision = registry.revision();

    assert!(registry.set_status(id, AlertStatus::Investigating).is_err());
    assert_eq!(registry.revision(), revision);
}

#[test]
fn concurrent_appends_are_all_kept() {
    let registry = Arc::new(AlertRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    registry
                        .append(sample_alert(AlertType::Activity, Severity::Medium, "Pig Pen A"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 2_000);
    assert_eq!(registry.revision(), 2_000);
}
