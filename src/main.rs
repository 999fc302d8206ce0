// src/main.rs
//! Punto de entrada del simulador de alertas de bioseguridad.
//!
//! Objetivos principales:
//! - Cargar configuración, tracing y métricas.
//! - Construir registro de alertas, pipeline y generador de detecciones.
//! - Armar el detector simulado y reflejar cada cambio del registro en el log.
//! - Gestionar apagado ordenado (graceful shutdown) y liberación del temporizador.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::{select, signal, sync::broadcast, task::JoinSet};
use tracing::{error, info, warn};

use biosecurity_alerting::config::app_config::AppConfig;
use biosecurity_alerting::repository::alert_registry::{AlertRegistry, RegistryEvent};
use biosecurity_alerting::scheduler::detection_generator::DetectionGenerator;
use biosecurity_alerting::service::alert_pipeline::AlertPipeline;
use biosecurity_alerting::service::camera_overview::camera_overview;
use biosecurity_alerting::service::dashboard_observer::DashboardObserver;
use biosecurity_alerting::service::detection_feed::{DetectionFeed, VISIBLE_DETECTIONS};
use biosecurity_alerting::telemetry;
use biosecurity_alerting::usecase::seed_demo_alerts::seed_demo_alerts;

/// Señales de shutdown compartidas entre tareas.
#[derive(Clone)]
struct Shutdown {
    tx: broadcast::Sender<()>,
}
impl Shutdown {
    fn new() -> Self {
        let (tx, _rx) = broadcast::channel(8);
        Self { tx }
    }
    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
    fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

/// Rutas de configuración: argumentos de línea de comandos o `config/default.toml`.
fn config_paths() -> Vec<PathBuf> {
    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if args.is_empty() {
        vec![PathBuf::from("config/default.toml")]
    } else {
        args
    }
}

#[tokio::main]
async fn main() {
    // 1) Carga de configuración
    let cfg = match AppConfig::load(&config_paths()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("❌ No se pudo cargar la configuración: {e:#}");
            std::process::exit(1);
        }
    };

    // 2) Tracing + Métricas
    if let Err(e) = telemetry::tracing::init_tracing(&cfg.logging) {
        eprintln!("⚠️  Tracing parcial: {e}");
    }
    telemetry::metrics::register_core_metrics();

    // 3) Construcción de estado compartido
    let registry = Arc::new(AlertRegistry::new());
    let feed = Arc::new(DetectionFeed::new(cfg.generator.display_capacity));
    let pipeline = Arc::new(AlertPipeline::new(registry.clone(), feed.clone()));

    if cfg.seed_demo_alerts {
        if let Err(e) = seed_demo_alerts(&registry) {
            warn!(error = %e, "No se pudieron cargar las alertas de demostración");
        }
    }

    let sampler = match cfg.build_sampler() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Catálogo de detecciones inválido");
            std::process::exit(1);
        }
    };
    let generator = DetectionGenerator::new(sampler, pipeline.clone(), cfg.generator_config());
    let observer = match DashboardObserver::spawn(registry.clone()) {
        Ok(o) => o,
        Err(e) => {
            error!(error = %e, "No se pudo iniciar el observador del dashboard");
            std::process::exit(1);
        }
    };

    // 4) Disparadores de apagado
    let shutdown = Shutdown::new();
    let mut tasks = JoinSet::new();

    // 4.a) Resumen del dashboard tras cada cambio
    {
        let mut summary_rx = observer.subscribe();
        let mut shutdown_rx = shutdown.subscribe();
        tasks.spawn(async move {
            loop {
                select! {
                    changed = summary_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let summary = summary_rx.borrow_and_update().clone();
                        info!(
                            total = summary.total,
                            active = summary.active,
                            critical = summary.critical,
                            "📊 Dashboard actualizado"
                        );
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    // 4.b) Panel de notificaciones: nuevas alertas y detecciones visibles
    {
        let registry = registry.clone();
        let feed = feed.clone();
        let mut events = registry.subscribe();
        let mut shutdown_rx = shutdown.subscribe();
        tasks.spawn(async move {
            loop {
                select! {
                    received = events.recv() => match received {
                        Ok(RegistryEvent::Appended { id, .. }) => {
                            if let Some(alert) = registry.get(id) {
                                info!(
                                    alert_id = %id,
                                    severity = %alert.severity(),
                                    location = alert.location(),
                                    "🔔 {}",
                                    alert.title()
                                );
                            }
                            info!(visible = feed.visible(VISIBLE_DETECTIONS).len(), "🎥 Detecciones en panel");
                        }
                        Ok(RegistryEvent::StatusChanged { id, from, to, .. }) => {
                            info!(alert_id = %id, %from, %to, "🔁 Estado de alerta actualizado");
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "Panel de notificaciones retrasado");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = shutdown_rx.recv() => break,
                }
            }
        });
    }

    // 5) Armar el detector simulado
    match generator.arm() {
        Ok(_) => info!(
            status = ?generator.monitoring_status(),
            period = ?generator.config().tick_period,
            "🚀 Monitorización de cámaras iniciada con perfil: {}",
            cfg.environment.profile
        ),
        Err(e) => {
            error!(error = %e, "No se pudo armar el generador de detecciones");
            std::process::exit(1);
        }
    }

    // 6) Señales del SO y espera activa
    let graceful = async {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "No se pudo registrar handler de Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(e) => {
                    error!(error = %e, "No se pudo registrar SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        info!("🛑 Recibida señal de parada: iniciando graceful shutdown");
    };

    graceful.await;

    // 7) Desarmar primero: ninguna detección llega tras este punto.
    generator.dispose().await;
    shutdown.trigger();

    let grace = Duration::from_secs(5);
    let timed = tokio::time::timeout(grace, async {
        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                error!(error = ?e, "Tarea terminó con panic/error durante shutdown");
            }
        }
    });
    match timed.await {
        Ok(_) => info!("🧯 Shutdown limpio completado."),
        Err(_) => warn!("⏲️  Timeout en shutdown; forzando salida."),
    }

    let summary = observer.current();
    observer.shutdown().await;

    for camera in camera_overview(&cfg.cameras, &registry) {
        match camera.last_alert {
            Some(last) => info!(camera = %camera.camera.id, location = %camera.camera.location, last_alert = %last.title, "📷 Estado de cámara"),
            None => info!(camera = %camera.camera.id, location = %camera.camera.location, "📷 Sin alertas recientes"),
        }
    }
    info!(
        total = summary.total,
        active = summary.active,
        critical = summary.critical,
        "👋 Servicio detenido."
    );
}
