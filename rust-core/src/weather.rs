//! Current-temperature lookup against the OpenWeatherMap API.

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::WeatherConfig;
use crate::error::WeatherError;

pub const UNAUTHORIZED_HINT: &str =
    "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info.";

/// Anything that can report the current temperature (°C) for a city.
pub trait TemperatureSource {
    fn current_temperature(&self, city: &str, credential: &str) -> Result<f64, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

/// Map a provider response to a temperature or a typed failure.
pub fn interpret_response(status: u16, body: &str) -> Result<f64, WeatherError> {
    match status {
        200 => serde_json::from_str::<WeatherPayload>(body)
            .map(|p| p.main.temp)
            .map_err(|e| WeatherError::Provider {
                status,
                body: format!("unexpected payload: {}", e),
            }),
        401 => Err(WeatherError::Unauthorized {
            message: UNAUTHORIZED_HINT.to_string(),
        }),
        _ => Err(WeatherError::Provider {
            status,
            body: body.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(OpenWeatherClient {
            http,
            base_url: config.base_url.clone(),
        })
    }
}

impl TemperatureSource for OpenWeatherClient {
    fn current_temperature(&self, city: &str, credential: &str) -> Result<f64, WeatherError> {
        info!(city, "Fetching current temperature");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", credential), ("units", "metric")])
            .send()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let result = interpret_response(status, &body);
        if let Err(e) = &result {
            warn!(city, status, kind = e.kind(), "Weather fetch failed");
        }
        result
    }
}
