// src/scheduler/detection_generator.rs
//! Detection generator
//!
//! Responsibilities:
//! - While armed, evaluate one tick per `tick_period` (8s by default) on a Tokio timer.
//! - Delegate the emission decision to the `DetectionSampler` and hand emitted
//!   detections to a `DetectionSink`.
//! - Never run two ticks at once: ticks are evaluated inline in a single timer task
//!   and missed ticks are delayed, not bursted.
//! - Make `disarm` effective immediately: tick evaluation and `disarm` serialize on
//!   the same lock, and a tick from a superseded timer is discarded.
//!
//! Usage pattern:
//! - Construct with a sampler, a sink and a config.
//! - `arm()` / `disarm()` any number of times (both idempotent).
//! - `dispose().await` (or drop) to cancel the timer for good.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::domain::error::AlertingError;
use crate::domain::model::detection::DetectionEvent;
use crate::service::alert_pipeline::DetectionSink;
use crate::service::camera_overview::MonitoringStatus;
use crate::service::detection_sampler::DetectionSampler;
use crate::telemetry::metrics::DETECTION_TICKS;

/// Configuration for the generator timer
#[derive(Debug, Clone)]
pub struct DetectionGeneratorConfig {
    /// Wall-clock time between two ticks.
    pub tick_period: Duration,
}

impl Default for DetectionGeneratorConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(8),
        }
    }
}

enum Phase {
    Disarmed,
    Armed {
        epoch: u64,
        // Dropping the sender stops the timer task.
        shutdown_tx: mpsc::Sender<()>,
        join_handle: JoinHandle<()>,
    },
}

struct GeneratorState {
    phase: Phase,
    next_epoch: u64,
    ticks: u64,
    // Reset on every arm.
    ticks_since_arm: u64,
    sampler: DetectionSampler,
}

struct GeneratorInner {
    config: DetectionGeneratorConfig,
    sink: Arc<dyn DetectionSink>,
    state: Mutex<GeneratorState>,
}

impl GeneratorInner {
    fn lock(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Evaluate one tick for the timer identified by `epoch`.
    /// The whole decision and delivery happen under the state lock.
    fn on_tick(&self, epoch: u64) -> Option<DetectionEvent> {
        let mut state = self.lock();
        match state.phase {
            Phase::Armed { epoch: current, .. } if current == epoch => {}
            _ => {
                debug!(epoch, "discarding tick from a disarmed timer");
                return None;
            }
        }
        state.ticks += 1;
        state.ticks_since_arm += 1;
        metrics::increment_counter!(DETECTION_TICKS);

        let event = state.sampler.sample(Utc::now())?;
        if let Err(e) = self.sink.deliver(event.clone()) {
            warn!(error = %e, "detection sink rejected event");
        }
        Some(event)
    }
}

/// Simulated detector armed and disarmed by the monitoring panel.
pub struct DetectionGenerator {
    inner: Arc<GeneratorInner>,
}

impl DetectionGenerator {
    pub fn new(
        sampler: DetectionSampler,
        sink: Arc<dyn DetectionSink>,
        config: DetectionGeneratorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(GeneratorInner {
                config,
                sink,
                state: Mutex::new(GeneratorState {
                    phase: Phase::Disarmed,
                    next_epoch: 0,
                    ticks: 0,
                    ticks_since_arm: 0,
                    sampler,
                }),
            }),
        }
    }

    pub fn config(&self) -> &DetectionGeneratorConfig {
        &self.inner.config
    }

    /// Start the periodic timer. Returns `Ok(false)` if it was already armed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self) -> Result<bool, AlertingError> {
        let mut state = self.inner.lock();
        if matches!(state.phase, Phase::Armed { .. }) {
            debug!("arm requested while already armed");
            return Ok(false);
        }
        let handle = Handle::try_current().map_err(|_| AlertingError::RuntimeUnavailable)?;

        state.next_epoch += 1;
        state.ticks_since_arm = 0;
        let epoch = state.next_epoch;
        // tokio intervals reject a zero period.
        let period = self.inner.config.tick_period.max(Duration::from_millis(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        // First tick one full period from now, not immediately.
        let start = Instant::now() + period;
        let join_handle = handle.spawn(run_timer(Arc::clone(&self.inner), epoch, start, period, shutdown_rx));

        state.phase = Phase::Armed {
            epoch,
            shutdown_tx,
            join_handle,
        };
        info!(epoch, ?period, "detection generator armed");
        Ok(true)
    }

    /// Stop the timer. Returns `false` if it was already disarmed.
    ///
    /// Once this returns no further detection is delivered; a tick that won
    /// the lock before us has already delivered completely.
    pub fn disarm(&self) -> bool {
        let stopped = self.take_timer().is_some();
        if !stopped {
            debug!("disarm requested while already disarmed");
        }
        stopped
    }

    fn take_timer(&self) -> Option<JoinHandle<()>> {
        let mut state = self.inner.lock();
        match std::mem::replace(&mut state.phase, Phase::Disarmed) {
            Phase::Armed {
                epoch,
                shutdown_tx,
                join_handle,
            } => {
                drop(shutdown_tx);
                info!(epoch, "detection generator disarmed");
                Some(join_handle)
            }
            Phase::Disarmed => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.inner.lock().phase, Phase::Armed { .. })
    }

    /// `online` right after arming, `processing` once the first tick has run.
    pub fn monitoring_status(&self) -> MonitoringStatus {
        let state = self.inner.lock();
        match state.phase {
            Phase::Disarmed => MonitoringStatus::Offline,
            Phase::Armed { .. } if state.ticks_since_arm == 0 => MonitoringStatus::Online,
            Phase::Armed { .. } => MonitoringStatus::Processing,
        }
    }

    /// Ticks evaluated while armed, emitted or not.
    pub fn ticks_evaluated(&self) -> u64 {
        self.inner.lock().ticks
    }

    /// Evaluate a tick right now, outside the timer cadence. No-op when disarmed.
    pub fn tick_now(&self) -> Option<DetectionEvent> {
        let epoch = match self.inner.lock().phase {
            Phase::Armed { epoch, .. } => epoch,
            Phase::Disarmed => return None,
        };
        self.inner.on_tick(epoch)
    }

    /// Disarm and wait for the timer task to finish.
    pub async fn dispose(self) {
        if let Some(join_handle) = self.take_timer() {
            if let Err(e) = join_handle.await {
                warn!(error = ?e, "detection timer task ended abnormally");
            }
        }
    }
}

impl Drop for DetectionGenerator {
    fn drop(&mut self) {
        self.take_timer();
    }
}

async fn run_timer(
    inner: Arc<GeneratorInner>,
    epoch: u64,
    start: Instant,
    period: Duration,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut ticker = time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            // Resolves with None once the sender is dropped by disarm.
            _ = shutdown_rx.recv() => break,
            _ = ticker.tick() => {
                inner.on_tick(epoch);
            }
        }
    }
    debug!(epoch, "detection timer exiting");
}
