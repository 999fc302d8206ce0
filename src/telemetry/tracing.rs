// src/telemetry/tracing.rs
//! Tracing setup for the biosecurity alerting pipeline.
//!
//! Responsibilities:
//! - Install a global `tracing` subscriber with an `EnvFilter`.
//! - `RUST_LOG` wins over the configured level so operators can raise verbosity ad hoc.
//! - Optional JSON output for log shippers; human-readable otherwise.
//! - Never abort the process: a second initialisation just reports an error.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::config::app_config::LoggingConfig;

const DEFAULT_LEVEL: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
pub fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = logging.level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(logging);

    let result = if logging.json {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true));
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(true));
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| anyhow!("Failed to set global tracing subscriber: {e}"))
}
