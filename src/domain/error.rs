use thiserror::Error;
use uuid::Uuid;

use crate::domain::model::alert::AlertStatus;

/// Nivel de criticidad del error para clasificación operativa
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorImpact {
    Recoverable,    // El llamador lo resuelve localmente (p. ej. control deshabilitado en la UI)
    NonRecoverable, // Configuración o entorno inválido, no tiene sentido reintentar
}

/// Tipos de error del dominio de alertas de bioseguridad.
/// Ninguno es fatal para el proceso: todos se devuelven al llamador.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertingError {
    #[error("Transición de estado inválida para la alerta {id}: {from} -> {to}")]
    InvalidTransition {
        id: Uuid,
        from: AlertStatus,
        to: AlertStatus,
    },

    #[error("Alerta no encontrada: {0}")]
    AlertNotFound(Uuid),

    #[error("Identificador de alerta duplicado: {0}")]
    DuplicateAlertId(Uuid),

    #[error("Estado de alerta desconocido: {0}")]
    InvalidStatus(String),

    #[error("Plantilla de detección inválida: {0}")]
    InvalidTemplate(String),

    #[error("Probabilidad de emisión fuera de [0, 1]: {0}")]
    InvalidProbability(f64),

    #[error("Alerta inválida: {0}")]
    InvalidAlert(String),

    #[error("No hay runtime de Tokio disponible para el temporizador de detección")]
    RuntimeUnavailable,
}

impl AlertingError {
    pub fn impact(&self) -> ErrorImpact {
        match self {
            AlertingError::InvalidTransition { .. }
            | AlertingError::AlertNotFound(_)
            | AlertingError::DuplicateAlertId(_)
            | AlertingError::InvalidStatus(_)
            | AlertingError::InvalidAlert(_) => ErrorImpact::Recoverable,
            AlertingError::InvalidTemplate(_)
            | AlertingError::InvalidProbability(_)
            | AlertingError::RuntimeUnavailable => ErrorImpact::NonRecoverable,
        }
    }

    /// Alerta asociada al error, si la hay (útil para logs estructurados).
    pub fn alert_id(&self) -> Option<Uuid> {
        match self {
            AlertingError::InvalidTransition { id, .. }
            | AlertingError::AlertNotFound(id)
            | AlertingError::DuplicateAlertId(id) => Some(*id),
            _ => None,
        }
    }
}
