//! Reading Sources

use crate::{RunMode, SensorSample, SourceError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;
use tracing::{debug, info};

/// pH range of simulated readings
pub const PH_RANGE: RangeInclusive<f64> = 5.0..=8.0;
/// Conductivity range of simulated readings (µS/cm)
pub const CONDUCTIVITY_RANGE: RangeInclusive<f64> = 300.0..=1200.0;
/// Ammonia range of simulated readings (mmol/L)
pub const AMMONIA_RANGE: RangeInclusive<f64> = 0.1..=2.0;

/// Anything that can produce a reading
pub trait SensorSource: Send + Sync {
    /// Acquire one reading
    fn read(&self) -> Result<SensorSample, SourceError>;

    /// Mode this source serves
    fn mode(&self) -> RunMode;
}

/// Build the source for a run mode
pub fn source_for(mode: RunMode) -> Box<dyn SensorSource> {
    info!("Using {} sensor source", mode);
    match mode {
        RunMode::Simulated => Box::new(SimulatedSource::new()),
        RunMode::Device => Box::new(DeviceSource),
    }
}

/// Uniform random readings rounded to two decimals
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
}

impl SimulatedSource {
    /// Create a source seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SensorSource for SimulatedSource {
    fn read(&self) -> Result<SensorSample, SourceError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| SourceError::Unavailable(format!("Lock error: {}", e)))?;

        let sample = SensorSample {
            ph: round2(rng.gen_range(PH_RANGE)),
            conductivity: round2(rng.gen_range(CONDUCTIVITY_RANGE)),
            ammonia: round2(rng.gen_range(AMMONIA_RANGE)),
        };
        debug!(?sample, "Generated simulated reading");
        Ok(sample)
    }

    fn mode(&self) -> RunMode {
        RunMode::Simulated
    }
}

/// Band hardware source.
///
/// Returns a fixed placeholder until the ESP32 acquisition driver lands.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceSource;

impl DeviceSource {
    pub const PLACEHOLDER: SensorSample = SensorSample {
        ph: 6.9,
        conductivity: 850.5,
        ammonia: 0.8,
    };
}

impl SensorSource for DeviceSource {
    fn read(&self) -> Result<SensorSample, SourceError> {
        Ok(Self::PLACEHOLDER)
    }

    fn mode(&self) -> RunMode {
        RunMode::Device
    }
}
