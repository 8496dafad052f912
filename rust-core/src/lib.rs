//! Tempwatch core: seasonal temperature baselines and anomaly detection.
//! Pure analysis stages over an in-memory dataset, plus a live weather lookup.

pub mod anomaly;
pub mod config;
pub mod error;
pub mod models;
pub mod seasonal;
pub mod session;
pub mod stats;
pub mod store;
pub mod trend;
pub mod weather;

pub use anomaly::{
    classify_historical, classify_live, current_month, HistoricalAnomalies, LiveVerdict,
};
pub use config::{AnalysisParams, WeatherConfig};
pub use error::{DataError, Error, Result, WeatherError};
pub use models::{AnomalyBand, RollingPoint, Season, SeasonalStat, TemperatureRecord};
pub use seasonal::SeasonalStats;
pub use session::{CityReport, Dataset, LiveReport, OverlayPoint, Session};
pub use trend::smooth;
pub use weather::{OpenWeatherClient, TemperatureSource};
