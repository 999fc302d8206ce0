// src/service/dashboard_observer.rs
//! Keeps a `watch` channel of dashboard counters in step with the registry.
//!
//! The observer subscribes to registry events and recomputes the summary from a
//! fresh snapshot after each one. A lagged receiver just recomputes; events are
//! only a wake-up signal, the registry is the source of truth.

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::domain::error::AlertingError;
use crate::repository::alert_registry::AlertRegistry;
use crate::service::alert_projections::DashboardSummary;

/// Handle to a running observer; dropping it stops the task.
pub struct DashboardObserver {
    summary_rx: watch::Receiver<DashboardSummary>,
    shutdown_tx: mpsc::Sender<()>,
    join_handle: JoinHandle<()>,
}

impl DashboardObserver {
    /// Spawn the observer on the current Tokio runtime.
    pub fn spawn(registry: Arc<AlertRegistry>) -> Result<Self, AlertingError> {
        let handle = Handle::try_current().map_err(|_| AlertingError::RuntimeUnavailable)?;
        // Subscribe before the first snapshot so no change slips in between.
        let mut events = registry.subscribe();
        let (summary_tx, summary_rx) = watch::channel(registry.summary());
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let join_handle = handle.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    received = events.recv() => match received {
                        Ok(event) => {
                            debug!(revision = event.revision(), "registry changed; recomputing summary");
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "dashboard observer lagged behind registry");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
                if summary_tx.send(registry.summary()).is_err() {
                    // Every receiver is gone, nobody to publish to.
                    break;
                }
            }
            info!("dashboard observer stopped");
        });

        Ok(Self {
            summary_rx,
            shutdown_tx,
            join_handle,
        })
    }

    pub fn current(&self) -> DashboardSummary {
        self.summary_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSummary> {
        self.summary_rx.clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.join_handle.await {
            warn!(error = ?e, "dashboard observer task failed");
        }
    }
}
