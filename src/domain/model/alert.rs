// src/domain/model/alert.rs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::error::AlertingError;
use crate::domain::model::detection::DetectionKind;
use crate::domain::model::severity::Severity;

/// Categoría de la condición señalada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Health,
    Hygiene,
    Activity,
    /// Sólo lo producen fuentes manuales o fixtures; el detector no lo emite.
    Temperature,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Health => "health",
            AlertType::Hygiene => "hygiene",
            AlertType::Activity => "activity",
            AlertType::Temperature => "temperature",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DetectionKind> for AlertType {
    fn from(kind: DetectionKind) -> Self {
        match kind {
            DetectionKind::Activity => AlertType::Activity,
            DetectionKind::Hygiene => AlertType::Hygiene,
            DetectionKind::Health => AlertType::Health,
        }
    }
}

/// Estado del ciclo de vida de una alerta.
///
/// Transiciones legales: `active -> investigating`, `active -> resolved`,
/// `investigating -> resolved`. `resolved` es terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
        }
    }

    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Investigating)
                | (AlertStatus::Active, AlertStatus::Resolved)
                | (AlertStatus::Investigating, AlertStatus::Resolved)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == AlertStatus::Resolved
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = AlertingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AlertStatus::Active),
            "investigating" => Ok(AlertStatus::Investigating),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(AlertingError::InvalidStatus(other.to_string())),
        }
    }
}

/// Registro duradero de una condición que requiere atención del operador.
///
/// Todo salvo `status` es inmutable una vez creado; por eso los campos son
/// privados y sólo el registro puede mover el estado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    id: Uuid,
    #[serde(rename = "type")]
    alert_type: AlertType,
    severity: Severity,
    title: String,
    description: String,
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    animal_id: Option<String>,
    timestamp: DateTime<Utc>,
    status: AlertStatus,
}

impl Alert {
    /// Crea una alerta activa con un UUID v4 nuevo.
    pub fn new(
        alert_type: AlertType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Alert {
            id: Uuid::new_v4(),
            alert_type,
            severity,
            title: title.into(),
            description: description.into(),
            location: location.into(),
            animal_id: None,
            timestamp,
            status: AlertStatus::Active,
        }
    }

    pub fn with_animal_id(mut self, animal_id: impl Into<String>) -> Self {
        self.animal_id = Some(animal_id.into());
        self
    }

    /// Sólo para fixtures: las alertas nuevas siempre nacen `active`.
    pub(crate) fn with_initial_status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn animal_id(&self) -> Option<&str> {
        self.animal_id.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Marca temporal en ISO-8601 con milisegundos y sufijo `Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn status(&self) -> AlertStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Aplica una transición validada. Devuelve el estado previo.
    pub(crate) fn transition_to(&mut self, next: AlertStatus) -> Result<AlertStatus, AlertingError> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(AlertingError::InvalidTransition {
                id: self.id,
                from,
                to: next,
            });
        }
        self.status = next;
        Ok(from)
    }

    /// Serializa la alerta a JSON (útil para paneles externos).
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
