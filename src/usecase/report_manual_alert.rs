// src/usecase/report_manual_alert.rs
//! Alta manual de alertas por parte de un operador (productor alternativo al detector).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::AlertingError;
use crate::domain::model::alert::{Alert, AlertType};
use crate::domain::model::severity::Severity;
use crate::repository::alert_registry::AlertRegistry;

/// Datos que envía el formulario de alta.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAlertRequest {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub animal_id: Option<String>,
    /// Si no se indica, se usa el instante de recepción.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ManualAlertRequest {
    fn validate(&self) -> Result<(), AlertingError> {
        if self.title.trim().is_empty() {
            return Err(AlertingError::InvalidAlert("el título es obligatorio".into()));
        }
        if self.location.trim().is_empty() {
            return Err(AlertingError::InvalidAlert("la ubicación es obligatoria".into()));
        }
        if matches!(&self.animal_id, Some(a) if a.trim().is_empty()) {
            return Err(AlertingError::InvalidAlert("animal_id vacío".into()));
        }
        Ok(())
    }

    /// Construye la alerta `active` con identificador nuevo.
    pub fn into_alert(self) -> Result<Alert, AlertingError> {
        self.validate()?;
        let alert = Alert::new(
            self.alert_type,
            self.severity,
            self.title.trim(),
            self.description.trim(),
            self.location.trim(),
            self.timestamp.unwrap_or_else(Utc::now),
        );
        Ok(match self.animal_id {
            Some(animal_id) => alert.with_animal_id(animal_id.trim()),
            None => alert,
        })
    }
}

pub fn report_manual_alert(registry: &AlertRegistry, request: ManualAlertRequest) -> Result<Uuid, AlertingError> {
    let alert = request.into_alert()?;
    info!(alert_type = %alert.alert_type(), severity = %alert.severity(), "alerta manual registrada");
    registry.append(alert)
}
