// src/domain/model/detection.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::AlertingError;
use crate::domain::model::severity::DetectionSeverity;

/// Categoría de anomalía que el detector simulado puede reportar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    Activity,
    Hygiene,
    Health,
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetectionKind::Activity => "activity",
            DetectionKind::Hygiene => "hygiene",
            DetectionKind::Health => "health",
        })
    }
}

/// Entrada del catálogo: una detección candidata que el generador puede emitir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionTemplate {
    pub kind: DetectionKind,
    pub severity: DetectionSeverity,
    pub description: String,
    pub location: String,
    /// Certeza del detector en `[0.0, 1.0]`.
    pub confidence: f64,
}

impl DetectionTemplate {
    pub fn validate(&self) -> Result<(), AlertingError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(AlertingError::InvalidTemplate(format!(
                "confidence {} fuera de [0, 1] en '{}'",
                self.confidence, self.description
            )));
        }
        if self.description.trim().is_empty() {
            return Err(AlertingError::InvalidTemplate("descripción vacía".into()));
        }
        if self.location.trim().is_empty() {
            return Err(AlertingError::InvalidTemplate(format!(
                "ubicación vacía en '{}'",
                self.description
            )));
        }
        Ok(())
    }

    /// Materializa la plantilla como evento con marca temporal fresca.
    pub fn instantiate(&self, occurred_at: DateTime<Utc>) -> DetectionEvent {
        DetectionEvent {
            kind: self.kind,
            severity: self.severity,
            description: self.description.clone(),
            location: self.location.clone(),
            confidence: self.confidence,
            occurred_at,
        }
    }
}

/// Lectura simulada y efímera. Nunca se persiste: la fábrica la convierte en `Alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub kind: DetectionKind,
    pub severity: DetectionSeverity,
    pub description: String,
    pub location: String,
    pub confidence: f64,
    pub occurred_at: DateTime<Utc>,
}

impl DetectionEvent {
    /// Confianza como porcentaje entero (0.87 -> 87).
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Catálogo validado y no vacío de plantillas.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCatalog {
    templates: Vec<DetectionTemplate>,
}

impl DetectionCatalog {
    pub fn new(templates: Vec<DetectionTemplate>) -> Result<Self, AlertingError> {
        if templates.is_empty() {
            return Err(AlertingError::InvalidTemplate("el catálogo de detecciones está vacío".into()));
        }
        for template in &templates {
            template.validate()?;
        }
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[DetectionTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DetectionTemplate> {
        self.templates.get(index)
    }
}

/// Las tres detecciones de demostración del panel de cámaras.
pub fn default_templates() -> Vec<DetectionTemplate> {
    vec![
        DetectionTemplate {
            kind: DetectionKind::Activity,
            severity: DetectionSeverity::Medium,
            description: "Unusual inactivity detected in Pig #7".into(),
            location: "Pig Pen A".into(),
            confidence: 0.87,
        },
        DetectionTemplate {
            kind: DetectionKind::Hygiene,
            severity: DetectionSeverity::High,
            description: "Water contamination indicators detected".into(),
            location: "Water Station".into(),
            confidence: 0.92,
        },
        DetectionTemplate {
            kind: DetectionKind::Health,
            severity: DetectionSeverity::Critical,
            description: "Abnormal breathing patterns in multiple chickens".into(),
            location: "Chicken Coop 1".into(),
            confidence: 0.95,
        },
    ]
}

impl Default for DetectionCatalog {
    fn default() -> Self {
        Self {
            templates: default_templates(),
        }
    }
}
