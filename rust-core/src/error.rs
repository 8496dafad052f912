//! Error types for dataset loading, analysis and the live weather fetch.

use thiserror::Error;

/// Failures while loading or analysing the historical dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid configuration: {name} - {reason}")]
    InvalidConfiguration { name: String, reason: String },
}

/// Failures from the live weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Error: {status}, {body}")]
    Provider { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl WeatherError {
    /// Stable identifier for the failure kind, used when rendering to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Unauthorized { .. } => "unauthorized",
            WeatherError::Provider { .. } => "provider_error",
            WeatherError::Network(_) => "network_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = DataError::InvalidConfiguration {
            name: "rolling_window".to_string(),
            reason: "must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: rolling_window - must be greater than 0"
        );
    }

    #[test]
    fn test_provider_error_display() {
        let err = WeatherError::Provider {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Error: 500, boom");
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn test_data_error_is_transparent() {
        let err: Error = DataError::InvalidMonth(13).into();
        assert_eq!(err.to_string(), "Invalid month: 13 (expected 1-12)");
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
