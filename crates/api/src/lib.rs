//! Arm-Ailment Band API Server
//!
//! HTTP gateway that ingests band readings, scores them with the
//! disease-risk classifier, stores both, and serves the latest prediction.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod routes;

use config::{BandConfig, LogConfig};
use inference_engine::InferenceEngine;
use sensor_source::{source_for, RunMode, SensorSource};
use storage::Repository;

/// Application context shared by all handlers
pub struct AppState {
    /// Reading log
    pub repository: Repository,
    /// Disease-risk classifier
    pub engine: InferenceEngine,
    /// Source for `/get_sensor_data`
    pub source: Box<dyn SensorSource>,
    /// Prometheus handle, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

/// Handle passed to handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create application state
    pub fn new(
        repository: Repository,
        engine: InferenceEngine,
        source: Box<dyn SensorSource>,
    ) -> Self {
        Self {
            repository,
            engine,
            source,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Open storage, prepare the engine and pick the sensor source
    pub async fn from_config(config: &BandConfig) -> anyhow::Result<Self> {
        let repository = Repository::connect(&config.database)
            .await
            .context("failed to open sensor database")?;
        repository
            .initialize()
            .await
            .context("failed to initialize sensor database")?;

        let engine = InferenceEngine::new(config.model.path.clone());
        if config.model.eager_load {
            engine
                .load_model()
                .await
                .context("failed to load classifier at startup")?;
        }

        let mut state = Self::new(repository, engine, source_for(config.mode));
        if config.server.enable_metrics {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")?;
            state = state.with_metrics(handle);
        }

        Ok(state)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub mode: RunMode,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub inference: InferenceHealth,
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// Classifier health
#[derive(Debug, Serialize)]
pub struct InferenceHealth {
    pub status: String,
    /// Configured ONNX artifact, if the engine loads from disk
    pub model_path: Option<String>,
    /// Name of the loaded classifier
    pub classifier: Option<String>,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub reading_count: Option<i64>,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/send_sensor_data", post(routes::readings::send_sensor_data))
        .route("/latest_prediction", get(routes::predictions::latest_prediction))
        .route("/get_sensor_data", get(routes::sensors::get_sensor_data))
        .route("/readings", get(routes::readings::list_readings))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (database, reading_count) = match state.repository.count().await {
        Ok(count) => (
            ComponentHealth {
                status: "ok".to_string(),
                detail: None,
            },
            Some(count),
        ),
        Err(e) => {
            warn!("Health check could not reach database: {}", e);
            (
                ComponentHealth {
                    status: "error".to_string(),
                    detail: Some(e.to_string()),
                },
                None,
            )
        }
    };

    let inference = InferenceHealth {
        status: if state.engine.is_loaded() {
            "loaded".to_string()
        } else {
            "not_loaded".to_string()
        },
        model_path: state
            .engine
            .model_path()
            .map(|path| path.display().to_string()),
        classifier: state.engine.classifier_name().map(str::to_string),
    };

    let status = if reading_count.is_some() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        mode: state.source.mode(),
        components: ComponentStatus {
            inference,
            database,
        },
        metrics: SystemMetrics { reading_count },
    })
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<SharedState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.level)
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    if config.json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the server until interrupted
pub async fn run_server(config: BandConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config).await?);
    let app = create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    info!(
        "Starting API server on {} (mode={})",
        listener.local_addr()?,
        config.mode
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.repository.close().await;
    Ok(())
}
