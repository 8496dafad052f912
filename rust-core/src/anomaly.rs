//! ±2σ anomaly classification.
//!
//! Two granularities live side by side: the historical overlay uses one band
//! over a city's whole series, while the live check uses the seasonal baseline
//! for the current calendar month.

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::error::DataError;
use crate::models::{AnomalyBand, Season, TemperatureRecord};
use crate::seasonal::SeasonalStats;
use crate::stats::{mean, sample_std};

#[derive(Debug, Clone, Serialize)]
pub struct HistoricalAnomalies<'a> {
    /// `None` when the series has fewer than two points.
    pub band: Option<AnomalyBand>,
    pub anomalies: Vec<&'a TemperatureRecord>,
}

/// Flag every record of `series` outside the whole-series band.
pub fn classify_historical<'a>(series: &[&'a TemperatureRecord]) -> HistoricalAnomalies<'a> {
    let temps: Vec<f64> = series.iter().map(|r| r.temperature).collect();
    let band = mean(&temps)
        .zip(sample_std(&temps))
        .map(|(m, s)| AnomalyBand::around(m, s));

    let anomalies = match band {
        Some(band) => series
            .iter()
            .copied()
            .filter(|r| band.is_anomaly(r.temperature))
            .collect(),
        None => vec![],
    };

    HistoricalAnomalies { band, anomalies }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LiveVerdict {
    Anomalous { band: AnomalyBand },
    Normal { band: AnomalyBand },
    /// No usable baseline for this city in the current season.
    Unknown,
}

impl LiveVerdict {
    /// `Some(true/false)` when classified, `None` when unknown.
    pub fn is_anomaly(&self) -> Option<bool> {
        match self {
            LiveVerdict::Anomalous { .. } => Some(true),
            LiveVerdict::Normal { .. } => Some(false),
            LiveVerdict::Unknown => None,
        }
    }

    pub fn band(&self) -> Option<AnomalyBand> {
        match self {
            LiveVerdict::Anomalous { band } | LiveVerdict::Normal { band } => Some(*band),
            LiveVerdict::Unknown => None,
        }
    }
}

/// Classify a live reading against the baseline for `month`'s season.
pub fn classify_live(
    city: &str,
    current_temp: f64,
    stats: &SeasonalStats,
    month: u32,
) -> Result<LiveVerdict, DataError> {
    let season = Season::from_month(month)?;
    let band = match stats.get(city, season).and_then(|s| s.band()) {
        Some(band) => band,
        None => return Ok(LiveVerdict::Unknown),
    };
    Ok(if band.is_anomaly(current_temp) {
        LiveVerdict::Anomalous { band }
    } else {
        LiveVerdict::Normal { band }
    })
}

/// Wall-clock month used for live checks.
pub fn current_month() -> u32 {
    Local::now().month()
}
