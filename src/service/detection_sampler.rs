// src/service/detection_sampler.rs
//! One tick's worth of the simulated vision pipeline.
//!
//! The sampler draws `r` uniformly in `[0, 1)`; when `r < emission_probability`
//! a template is picked uniformly from the catalog and stamped with the tick
//! time. Randomness is injected so tests can script the draws.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::AlertingError;
use crate::domain::model::detection::{DetectionCatalog, DetectionEvent};

/// Default per-tick emission probability.
pub const DEFAULT_EMISSION_PROBABILITY: f64 = 0.3;

/// Source of the two draws a tick needs.
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

/// Adapter for any `rand` generator.
pub struct RngSource<R>(pub R);

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }
}

pub struct DetectionSampler {
    catalog: DetectionCatalog,
    emission_probability: f64,
    random: Box<dyn RandomSource>,
}

impl DetectionSampler {
    pub fn new(
        catalog: DetectionCatalog,
        emission_probability: f64,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, AlertingError> {
        if !(0.0..=1.0).contains(&emission_probability) {
            return Err(AlertingError::InvalidProbability(emission_probability));
        }
        Ok(Self {
            catalog,
            emission_probability,
            random,
        })
    }

    /// Sampler over the built-in catalog with the default probability.
    pub fn with_defaults(random: Box<dyn RandomSource>) -> Self {
        Self {
            catalog: DetectionCatalog::default(),
            emission_probability: DEFAULT_EMISSION_PROBABILITY,
            random,
        }
    }

    pub fn emission_probability(&self) -> f64 {
        self.emission_probability
    }

    pub fn catalog(&self) -> &DetectionCatalog {
        &self.catalog
    }

    /// Evaluate one tick at `now`.
    pub fn sample(&mut self, now: DateTime<Utc>) -> Option<DetectionEvent> {
        let r = self.random.unit();
        if r >= self.emission_probability {
            return None;
        }
        let len = self.catalog.len();
        // Guard against sources that ignore the bound.
        let index = self.random.index(len).min(len - 1);
        self.catalog.get(index).map(|t| t.instantiate(now))
    }
}
