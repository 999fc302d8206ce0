// src/telemetry/metrics.rs
//! Metric names and descriptions for the alert pipeline.
//!
//! Instruments are emitted through the `metrics` facade; without an installed
//! recorder every call is a no-op, so library code can record unconditionally.
//!
//! Usage:
//! - Call `register_core_metrics()` once at startup (repeated calls are ignored).
//! - Record with the `metrics` macros using the constants below.

use metrics::{describe_counter, describe_gauge, Unit};
use once_cell::sync::OnceCell;

pub const DETECTION_TICKS: &str = "detection_ticks_total";
pub const DETECTIONS_EMITTED: &str = "detections_emitted_total";
pub const ALERTS_APPENDED: &str = "alerts_appended_total";
pub const STATUS_TRANSITIONS: &str = "alert_status_transitions_total";
pub const STATUS_REJECTIONS: &str = "alert_status_rejections_total";
pub const ALERTS_ACTIVE: &str = "alerts_active";
pub const ALERTS_CRITICAL: &str = "alerts_critical";

static REGISTERED: OnceCell<()> = OnceCell::new();

pub fn register_core_metrics() {
    REGISTERED.get_or_init(|| {
        describe_counter!(DETECTION_TICKS, Unit::Count, "Generator ticks evaluated while armed");
        describe_counter!(DETECTIONS_EMITTED, Unit::Count, "Simulated detections emitted");
        describe_counter!(ALERTS_APPENDED, Unit::Count, "Alerts appended to the registry");
        describe_counter!(STATUS_TRANSITIONS, Unit::Count, "Alert status transitions applied");
        describe_counter!(STATUS_REJECTIONS, Unit::Count, "Alert status transitions rejected");
        describe_gauge!(ALERTS_ACTIVE, Unit::Count, "Alerts currently in the active status");
        describe_gauge!(ALERTS_CRITICAL, Unit::Count, "Critical alerts in the registry");
    });
}
