//! Prediction Routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::SharedState;

/// Message returned before any reading has been stored
pub const NO_DATA_MESSAGE: &str = "No data yet";

/// Prediction payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionBody {
    pub prediction: f64,
}

/// Response for latest prediction endpoint
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LatestPrediction {
    Available(PredictionBody),
    Empty { message: &'static str },
}

/// Get the prediction of the most recently stored reading
pub async fn latest_prediction(
    State(state): State<SharedState>,
) -> Result<Json<LatestPrediction>, ApiError> {
    let latest = match state.repository.latest_prediction().await? {
        Some(prediction) => LatestPrediction::Available(PredictionBody { prediction }),
        None => LatestPrediction::Empty {
            message: NO_DATA_MESSAGE,
        },
    };

    Ok(Json(latest))
}
