//! Sensor Routes

use axum::{extract::State, Json};
use sensor_source::SensorSample;

use crate::error::ApiError;
use crate::SharedState;

/// Get a reading from the configured sensor source
pub async fn get_sensor_data(
    State(state): State<SharedState>,
) -> Result<Json<SensorSample>, ApiError> {
    let sample = state.source.read()?;
    Ok(Json(sample))
}
