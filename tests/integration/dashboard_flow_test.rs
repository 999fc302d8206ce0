// tests/integration/dashboard_flow_test.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use biosecurity_alerting::service::camera_overview::{camera_overview, default_cameras};
use biosecurity_alerting::service::dashboard_observer::DashboardObserver;
use biosecurity_alerting::usecase::report_manual_alert::{report_manual_alert, ManualAlertRequest};
use biosecurity_alerting::usecase::seed_demo_alerts::seed_demo_alerts;
use biosecurity_alerting::usecase::update_alert_status::{allowed_next_statuses, update_alert_status};
use biosecurity_alerting::{
    Alert, AlertRegistry, AlertStatus, AlertType, AlertingError, ErrorImpact, RegistryEvent, Severity,
};

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn observer_tracks_appends_and_transitions() {
    let registry = Arc::new(AlertRegistry::new());
    let observer = DashboardObserver::spawn(registry.clone()).unwrap();
    let mut rx = observer.subscribe();
    assert_eq!(observer.current().total, 0);

    let id = registry
        .append(Alert::new(
            AlertType::Health,
            Severity::Critical,
            "Abnormal breathing",
            "d",
            "Chicken Coop 1",
            Utc::now(),
        ))
        .unwrap();
    timeout(WAIT, rx.wait_for(|s| s.total == 1 && s.critical == 1 && s.active == 1))
        .await
        .expect("summary after append")
        .unwrap();

    update_alert_status(&registry, id, "resolved").unwrap();
    timeout(WAIT, rx.wait_for(|s| s.active == 0 && s.resolved == 1))
        .await
        .expect("summary after resolve")
        .unwrap();
    assert_eq!(observer.current().critical, 1);

    observer.shutdown().await;
}

#[tokio::test]
async fn operator_status_updates_follow_lifecycle() {
    let registry = AlertRegistry::new();
    seed_demo_alerts(&registry).unwrap();
    let investigating = registry
        .all()
        .into_iter()
        .find(|a| a.status() == AlertStatus::Investigating)
        .unwrap();

    assert_eq!(allowed_next_statuses(investigating.status()), vec![AlertStatus::Resolved]);

    let err = update_alert_status(&registry, investigating.id(), "active").unwrap_err();
    assert!(matches!(err, AlertingError::InvalidTransition { .. }));
    assert_eq!(err.impact(), ErrorImpact::Recoverable);

    let change = update_alert_status(&registry, investigating.id(), "resolved").unwrap();
    assert_eq!(change.from, AlertStatus::Investigating);
    assert_eq!(change.to, AlertStatus::Resolved);
    assert!(allowed_next_statuses(AlertStatus::Resolved).is_empty());

    assert!(matches!(
        update_alert_status(&registry, investigating.id(), "escalated"),
        Err(AlertingError::InvalidStatus(_))
    ));
    assert!(matches!(
        update_alert_status(&registry, uuid::Uuid::new_v4(), "resolved"),
        Err(AlertingError::AlertNotFound(_))
    ));
}

#[tokio::test]
async fn subscribers_see_events_in_commit_order() {
    let registry = AlertRegistry::new();
    let mut events = registry.subscribe();

    let request: ManualAlertRequest = serde_json::from_value(serde_json::json!({
        "type": "temperature",
        "severity": "high",
        "title": "Heat stress",
        "description": "Barn temperature above threshold",
        "location": "Pig Pen A",
        "animalId": "PIG_007"
    }))
    .unwrap();
    let id = report_manual_alert(&registry, request).unwrap();
    registry.set_status(id, AlertStatus::Investigating).unwrap();

    match events.recv().await.unwrap() {
        RegistryEvent::Appended { id: got, revision } => {
            assert_eq!(got, id);
            assert_eq!(revision, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match events.recv().await.unwrap() {
        RegistryEvent::StatusChanged { from, to, revision, .. } => {
            assert_eq!(from, AlertStatus::Active);
            assert_eq!(to, AlertStatus::Investigating);
            assert_eq!(revision, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(registry.get(id).unwrap().animal_id(), Some("PIG_007"));
}

#[test]
fn camera_panel_shows_last_alert_per_location() {
    let registry = AlertRegistry::new();
    registry
        .append(Alert::new(AlertType::Activity, Severity::Medium, "first", "d", "Pig Pen A", Utc::now()))
        .unwrap();
    registry
        .append(Alert::new(AlertType::Activity, Severity::High, "second", "d", "Pig Pen A", Utc::now()))
        .unwrap();

    let panel = camera_overview(&default_cameras(), &registry);
    let pen = panel.iter().find(|c| c.camera.location == "Pig Pen A").unwrap();
    assert_eq!(pen.last_alert.as_ref().unwrap().title, "second");
    assert!(panel
        .iter()
        .filter(|c| c.camera.location != "Pig Pen A")
        .all(|c| c.last_alert.is_none()));
}
