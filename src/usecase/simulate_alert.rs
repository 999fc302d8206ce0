// src/usecase/simulate_alert.rs
//! Fábrica de alertas: convierte una detección simulada en una alerta duradera.
//!
//! El mapeo es total y puro salvo por el identificador, que siempre es nuevo.

use crate::domain::model::alert::Alert;
use crate::domain::model::detection::DetectionEvent;

pub fn detection_title(event: &DetectionEvent) -> String {
    format!("AI Detection: {}", event.description)
}

pub fn detection_description(event: &DetectionEvent) -> String {
    format!(
        "Automated monitoring system detected potential issue with {}% confidence: {}",
        event.confidence_percent(),
        event.description
    )
}

/// Construye la alerta `active` asociada a una detección.
pub fn alert_from_detection(event: &DetectionEvent) -> Alert {
    Alert::new(
        event.kind.into(),
        event.severity.into(),
        detection_title(event),
        detection_description(event),
        event.location.clone(),
        event.occurred_at,
    )
}
