// src/service/alert_pipeline.rs
//! Wiring between the detection generator and its consumers.
//!
//! `AlertPipeline` is the generator's sink: it records the raw detection in the
//! monitoring feed, turns it into an alert and appends it to the registry.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::error::AlertingError;
use crate::domain::model::alert::Alert;
use crate::domain::model::detection::DetectionEvent;
use crate::repository::alert_registry::AlertRegistry;
use crate::service::detection_feed::DetectionFeed;
use crate::telemetry::metrics::DETECTIONS_EMITTED;
use crate::usecase::simulate_alert::alert_from_detection;

/// Receives every detection the generator emits.
///
/// Called with the generator's state lock held, so implementations must not
/// block or call back into the generator.
pub trait DetectionSink: Send + Sync + 'static {
    fn deliver(&self, event: DetectionEvent) -> Result<(), AlertingError>;
}

pub struct AlertPipeline {
    registry: Arc<AlertRegistry>,
    feed: Arc<DetectionFeed>,
}

impl AlertPipeline {
    pub fn new(registry: Arc<AlertRegistry>, feed: Arc<DetectionFeed>) -> Self {
        Self { registry, feed }
    }

    pub fn registry(&self) -> &Arc<AlertRegistry> {
        &self.registry
    }

    pub fn feed(&self) -> &Arc<DetectionFeed> {
        &self.feed
    }

    /// Factory, registry, then feed. Returns the new alert id.
    pub fn ingest(&self, event: DetectionEvent) -> Result<Uuid, AlertingError> {
        info!(
            kind = %event.kind,
            severity = %event.severity,
            location = %event.location,
            confidence = event.confidence,
            "detection emitted"
        );
        metrics::increment_counter!(DETECTIONS_EMITTED);
        let alert = alert_from_detection(&event);
        self.record(event, alert)
    }

    // The feed only shows detections that made it into the registry.
    fn record(&self, event: DetectionEvent, alert: Alert) -> Result<Uuid, AlertingError> {
        let id = self.registry.append(alert)?;
        self.feed.push(event);
        Ok(id)
    }
}

impl DetectionSink for AlertPipeline {
    fn deliver(&self, event: DetectionEvent) -> Result<(), AlertingError> {
        self.ingest(event).map(|_| ())
    }
}
