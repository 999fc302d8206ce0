// src/usecase/seed_demo_alerts.rs
//! Carga las alertas de demostración que el panel muestra al iniciar sesión.

use chrono::{Duration, Utc};
use tracing::info;

use crate::domain::error::AlertingError;
use crate::domain::model::alert::{Alert, AlertStatus, AlertType};
use crate::domain::model::severity::Severity;
use crate::repository::alert_registry::AlertRegistry;

/// Alertas de ejemplo, en el orden en que deben verse (la primera arriba).
pub fn demo_alerts() -> Vec<Alert> {
    let now = Utc::now();
    vec![
        Alert::new(
            AlertType::Health,
            Severity::High,
            "Respiratory Symptoms Detected",
            "Multiple chickens showing signs of respiratory distress in Coop A",
            "Coop A, Section 2",
            now - Duration::hours(2),
        )
        .with_animal_id("CHICK_001-005"),
        Alert::new(
            AlertType::Activity,
            Severity::Medium,
            "Unusual Inactivity",
            "Pig #3 showing reduced movement and feeding activity",
            "Pen 3, Block B",
            now - Duration::hours(4),
        )
        .with_animal_id("PIG_003")
        .with_initial_status(AlertStatus::Investigating),
        Alert::new(
            AlertType::Hygiene,
            Severity::Medium,
            "Water System Alert",
            "Water quality parameters outside normal range in Block C",
            "Block C Water Station",
            now - Duration::hours(6),
        ),
        Alert::new(
            AlertType::Temperature,
            Severity::Critical,
            "Temperature Spike",
            "Brooder temperature exceeded 35°C in Nursery 1",
            "Nursery 1",
            now - Duration::hours(1),
        ),
    ]
}

/// Inserta las alertas de ejemplo de forma que el orden del registro coincida
/// con el de `demo_alerts` (el registro antepone cada inserción).
pub fn seed_demo_alerts(registry: &AlertRegistry) -> Result<usize, AlertingError> {
    let alerts = demo_alerts();
    let count = alerts.len();
    for alert in alerts.into_iter().rev() {
        registry.append(alert)?;
    }
    info!(count, "alertas de demostración cargadas");
    Ok(count)
}
