// src/config/app_config.rs

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};
use tracing::info;

use crate::domain::model::detection::{default_templates, DetectionCatalog, DetectionTemplate};
use crate::scheduler::detection_generator::DetectionGeneratorConfig;
use crate::service::camera_overview::{default_cameras, CameraConfig};
use crate::service::detection_feed::DEFAULT_FEED_CAPACITY;
use crate::service::detection_sampler::{DetectionSampler, RngSource, DEFAULT_EMISSION_PROBABILITY};

/// Estructura principal que representa la configuración de la aplicación.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub generator: GeneratorSettings,
    /// Catálogo de detecciones candidatas del simulador.
    #[serde(default = "default_templates")]
    pub catalog: Vec<DetectionTemplate>,
    #[serde(default = "default_cameras")]
    pub cameras: Vec<CameraConfig>,
    /// Cargar las alertas de ejemplo al arrancar.
    #[serde(default = "default_true")]
    pub seed_demo_alerts: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub profile: String, // e.g. "development", "staging", "production"
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            profile: "development".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

/// Parámetros del generador de detecciones simuladas.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_tick_period_secs")]
    pub tick_period_secs: u64,
    #[serde(default = "default_emission_probability")]
    pub emission_probability: f64,
    #[serde(default = "default_display_capacity")]
    pub display_capacity: usize,
    /// Semilla fija para reproducir una sesión de demo.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            tick_period_secs: default_tick_period_secs(),
            emission_probability: default_emission_probability(),
            display_capacity: default_display_capacity(),
            seed: None,
        }
    }
}

fn default_tick_period_secs() -> u64 {
    8
}

fn default_emission_probability() -> f64 {
    DEFAULT_EMISSION_PROBABILITY
}

fn default_display_capacity() -> usize {
    DEFAULT_FEED_CAPACITY
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            logging: LoggingConfig::default(),
            generator: GeneratorSettings::default(),
            catalog: default_templates(),
            cameras: default_cameras(),
            seed_demo_alerts: true,
        }
    }
}

impl AppConfig {
    /// Carga desde archivos (en orden, el último sobrescribe) y variables `APP__*`.
    pub fn load(config_paths: &[PathBuf]) -> Result<Self> {
        let mut cfg = Config::builder();

        for path in config_paths {
            if path.exists() {
                cfg = cfg.add_source(File::from(path.clone()));
                info!("Loaded config file: {:?}", path);
            } else {
                info!("Config file not found, skipping: {:?}", path);
            }
        }

        Self::finish(cfg.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        ))
    }

    /// Carga desde un texto TOML (útil en tests y para configuración embebida).
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Self::finish(Config::builder().add_source(File::from_str(raw, FileFormat::Toml)))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let built = builder.build().context("Failed to build configuration")?;
        let app_config: AppConfig = built
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validar configuración con reglas propias.
    pub fn validate(&self) -> Result<()> {
        let valid_profiles = ["development", "staging", "production"];
        if !valid_profiles.contains(&self.environment.profile.as_str()) {
            anyhow::bail!(
                "Invalid environment profile '{}', must be one of {:?}",
                self.environment.profile,
                valid_profiles
            );
        }

        let generator = &self.generator;
        if generator.tick_period_secs == 0 {
            anyhow::bail!("generator.tick_period_secs must be greater than zero");
        }
        if !(0.0..=1.0).contains(&generator.emission_probability) {
            anyhow::bail!(
                "generator.emission_probability {} must be within [0, 1]",
                generator.emission_probability
            );
        }
        if generator.display_capacity == 0 {
            anyhow::bail!("generator.display_capacity must be greater than zero");
        }

        self.detection_catalog().context("Invalid detection catalog")?;
        Ok(())
    }

    pub fn detection_catalog(&self) -> Result<DetectionCatalog, crate::domain::error::AlertingError> {
        DetectionCatalog::new(self.catalog.clone())
    }

    pub fn generator_config(&self) -> DetectionGeneratorConfig {
        DetectionGeneratorConfig {
            tick_period: Duration::from_secs(self.generator.tick_period_secs),
        }
    }

    /// Muestreador con semilla fija si está configurada, entropía del sistema si no.
    pub fn build_sampler(&self) -> Result<DetectionSampler> {
        let random = match self.generator.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        };
        Ok(DetectionSampler::new(
            self.detection_catalog()?,
            self.generator.emission_probability,
            Box::new(random),
        )?)
    }
}
