// src/usecase/update_alert_status.rs
//! Transición de estado solicitada por un operador (p. ej. "resolver alerta").
//!
//! La UI envía el estado como texto; aquí se interpreta, se aplica sobre el
//! registro y se deja constancia en el log. Un rechazo nunca es fatal: el
//! llamador recibe el error y decide (normalmente, deshabilitar el control).

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::AlertingError;
use crate::domain::model::alert::AlertStatus;
use crate::repository::alert_registry::AlertRegistry;

/// Resultado de una transición aplicada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub alert_id: Uuid,
    pub from: AlertStatus,
    pub to: AlertStatus,
}

#[instrument(skip(registry))]
pub fn update_alert_status(
    registry: &AlertRegistry,
    alert_id: Uuid,
    requested: &str,
) -> Result<StatusChange, AlertingError> {
    let to: AlertStatus = requested.parse()?;
    let from = registry.set_status(alert_id, to)?;
    info!(%from, %to, "estado de alerta actualizado por operador");
    Ok(StatusChange { alert_id, from, to })
}

/// Estados a los que la UI puede ofrecer mover la alerta.
pub fn allowed_next_statuses(current: AlertStatus) -> Vec<AlertStatus> {
    [AlertStatus::Active, AlertStatus::Investigating, AlertStatus::Resolved]
        .into_iter()
        .filter(|next| current.can_transition_to(*next))
        .collect()
}
