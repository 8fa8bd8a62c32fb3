//! Reading Routes

use axum::{
    extract::{Query, State},
    Json,
};
use inference_engine::FeatureVector;
use metrics::{counter, histogram};
use sensor_source::SensorSample;
use serde::{Deserialize, Serialize};
use storage::{NewReading, SensorRecord};
use tracing::info;

use super::predictions::PredictionBody;
use crate::error::ApiError;
use crate::SharedState;

/// Query parameters for readings endpoint
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// Response for readings endpoint
#[derive(Debug, Serialize)]
pub struct ReadingsResponse {
    pub data: Vec<SensorRecord>,
    pub count: usize,
}

/// Ingest a reading: predict, store, then return the prediction.
///
/// Nothing is written when prediction fails. A storage failure after a
/// successful prediction fails the request and the prediction is dropped.
pub async fn send_sensor_data(
    State(state): State<SharedState>,
    Json(sample): Json<SensorSample>,
) -> Result<Json<PredictionBody>, ApiError> {
    let features = FeatureVector::from(&sample);

    let result = state.engine.predict(&features).await.map_err(|e| {
        counter!("band_inference_failures_total").increment(1);
        e
    })?;
    histogram!("band_inference_latency_ms").record(result.latency.as_secs_f64() * 1000.0);

    let reading = NewReading {
        ph: sample.ph,
        conductivity: sample.conductivity,
        ammonia: sample.ammonia,
        prediction: result.probability,
    };
    let id = state.repository.insert(&reading).await.map_err(|e| {
        counter!("band_storage_failures_total").increment(1);
        e
    })?;

    counter!("band_readings_ingested_total").increment(1);
    info!(id, prediction = result.probability, "Stored reading");

    Ok(Json(PredictionBody {
        prediction: result.probability,
    }))
}

/// List the most recent stored readings
pub async fn list_readings(
    State(state): State<SharedState>,
    Query(params): Query<ReadingsQuery>,
) -> Result<Json<ReadingsResponse>, ApiError> {
    let limit = params.limit.min(500);
    let data = state.repository.recent(limit).await?;

    Ok(Json(ReadingsResponse {
        count: data.len(),
        data,
    }))
}
