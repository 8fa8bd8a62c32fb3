//! Run Mode

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects where `/get_sensor_data` readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Synthetic readings from a random generator
    #[default]
    #[serde(alias = "dummy")]
    Simulated,
    /// Readings from the band hardware
    #[serde(alias = "esp32")]
    Device,
}

impl RunMode {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Simulated => "simulated",
            RunMode::Device => "device",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "dummy" => Ok(RunMode::Simulated),
            "device" | "esp32" => Ok(RunMode::Device),
            other => Err(format!("unknown run mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("simulated".parse::<RunMode>().unwrap(), RunMode::Simulated);
        assert_eq!("Device".parse::<RunMode>().unwrap(), RunMode::Device);
        assert_eq!("dummy".parse::<RunMode>().unwrap(), RunMode::Simulated);
        assert_eq!("esp32".parse::<RunMode>().unwrap(), RunMode::Device);
        assert!("bluetooth".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let mode: RunMode = serde_json::from_str("\"esp32\"").unwrap();
        assert_eq!(mode, RunMode::Device);
        assert_eq!(serde_json::to_string(&RunMode::Simulated).unwrap(), "\"simulated\"");
    }
}
