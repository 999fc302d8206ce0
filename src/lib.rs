//! Farm biosecurity alerting core.
//!
//! A simulated detector produces sparse detection events while armed; each one
//! becomes an alert in the process-wide registry, from which the dashboard,
//! notification feed and camera panel derive their views.

pub mod config {
    pub mod app_config;
}

pub mod domain {
    pub mod error;
    pub mod model {
        pub mod alert;
        pub mod detection;
        pub mod severity;
    }
}

pub mod repository {
    pub mod alert_registry;
}

pub mod scheduler {
    pub mod detection_generator;
}

pub mod service {
    pub mod alert_pipeline;
    pub mod alert_projections;
    pub mod camera_overview;
    pub mod dashboard_observer;
    pub mod detection_feed;
    pub mod detection_sampler;
}

pub mod telemetry {
    pub mod metrics;
    pub mod tracing;
}

pub mod usecase {
    pub mod report_manual_alert;
    pub mod seed_demo_alerts;
    pub mod simulate_alert;
    pub mod update_alert_status;
}

pub use domain::error::{AlertingError, ErrorImpact};
pub use domain::model::alert::{Alert, AlertStatus, AlertType};
pub use domain::model::detection::{DetectionCatalog, DetectionEvent, DetectionKind, DetectionTemplate};
pub use domain::model::severity::{DetectionSeverity, Severity};
pub use repository::alert_registry::{AlertRegistry, RegistryEvent};
pub use scheduler::detection_generator::{DetectionGenerator, DetectionGeneratorConfig};
pub use service::alert_pipeline::{AlertPipeline, DetectionSink};
pub use service::detection_feed::DetectionFeed;
pub use service::detection_sampler::{DetectionSampler, RandomSource, RngSource};
