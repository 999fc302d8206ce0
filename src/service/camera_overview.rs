// src/service/camera_overview.rs
//! Camera status panel: each configured camera joined with the last alert raised
//! at its location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::alert::{Alert, AlertStatus};
use crate::domain::model::severity::Severity;
use crate::repository::alert_registry::AlertRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Active,
    Maintenance,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub id: String,
    pub location: String,
    pub status: CameraStatus,
}

/// State of the simulated detector as shown on the camera panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringStatus {
    /// Armed, no tick evaluated yet.
    Online,
    /// Armed and evaluating ticks.
    Processing,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastAlertMarker {
    pub id: Uuid,
    pub title: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<&Alert> for LastAlertMarker {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id(),
            title: alert.title().to_string(),
            severity: alert.severity(),
            status: alert.status(),
            timestamp: alert.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraOverview {
    pub camera: CameraConfig,
    pub last_alert: Option<LastAlertMarker>,
}

pub fn camera_overview(cameras: &[CameraConfig], registry: &AlertRegistry) -> Vec<CameraOverview> {
    cameras
        .iter()
        .map(|camera| CameraOverview {
            camera: camera.clone(),
            last_alert: registry
                .last_alert_for(&camera.location)
                .as_ref()
                .map(LastAlertMarker::from),
        })
        .collect()
}

pub fn default_cameras() -> Vec<CameraConfig> {
    [
        ("cam_001", "Pig Pen A", CameraStatus::Active),
        ("cam_002", "Chicken Coop 1", CameraStatus::Active),
        ("cam_003", "Feed Storage", CameraStatus::Maintenance),
        ("cam_004", "Water Station", CameraStatus::Active),
    ]
    .into_iter()
    .map(|(id, location, status)| CameraConfig {
        id: id.to_string(),
        location: location.to_string(),
        status,
    })
    .collect()
}
