// src/domain/model/severity.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::AlertingError;

/// Nivel de criticidad de una alerta.
/// El orden de declaración define el orden total: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Observación sin impacto inmediato en el lote.
    Low,
    /// Requiere seguimiento por parte del granjero.
    Medium,
    /// Riesgo sanitario, conviene avisar al veterinario.
    High,
    /// Acción inmediata requerida.
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AlertingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" | "crit" => Ok(Severity::Critical),
            other => Err(AlertingError::InvalidAlert(format!("severidad desconocida '{other}'"))),
        }
    }
}

/// Subconjunto de severidades que puede producir el detector.
/// Una detección nunca es `low`, y el tipo lo garantiza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSeverity {
    Medium,
    High,
    Critical,
}

impl From<DetectionSeverity> for Severity {
    fn from(value: DetectionSeverity) -> Self {
        match value {
            DetectionSeverity::Medium => Severity::Medium,
            DetectionSeverity::High => Severity::High,
            DetectionSeverity::Critical => Severity::Critical,
        }
    }
}

impl fmt::Display for DetectionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Severity::from(*self).fmt(f)
    }
}
