//! Request-level parameters. Missing fields fall back to the defaults below.

use serde::Deserialize;

use crate::error::DataError;
use crate::trend::DEFAULT_WINDOW;

pub const OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub rolling_window: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        AnalysisParams {
            rolling_window: DEFAULT_WINDOW,
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), DataError> {
        if self.rolling_window == 0 {
            return Err(DataError::InvalidConfiguration {
                name: "rolling_window".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            base_url: OPENWEATHER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
