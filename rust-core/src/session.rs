//! Per-user analysis session: one loaded dataset plus its memoized baselines.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use crate::anomaly::{classify_historical, classify_live, LiveVerdict};
use crate::config::AnalysisParams;
use crate::error::{DataError, Result, WeatherError};
use crate::models::{AnomalyBand, SeasonalStat, TemperatureRecord};
use crate::seasonal::SeasonalStats;
use crate::stats::{describe, Summary};
use crate::store::{self, DatasetId};
use crate::trend::smooth;
use crate::weather::TemperatureSource;

/// A parsed dataset and the baselines derived from it.
#[derive(Debug)]
pub struct Dataset {
    pub id: DatasetId,
    pub records: Vec<TemperatureRecord>,
    pub seasonal: SeasonalStats,
}

impl Dataset {
    pub fn from_raw(raw: &[u8]) -> std::result::Result<Self, DataError> {
        let id = DatasetId::of(raw);
        let records = store::load(raw)?;
        let seasonal = SeasonalStats::compute(&records);
        info!(dataset = %id, rows = records.len(), groups = seasonal.len(), "Dataset ready");
        Ok(Dataset {
            id,
            records,
            seasonal,
        })
    }

    pub fn cities(&self) -> Vec<String> {
        store::cities(&self.records)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayPoint {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub rolling_mean: Option<f64>,
    pub is_anomaly: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityReport {
    pub city: String,
    pub summary: Summary,
    pub band: Option<AnomalyBand>,
    pub anomaly_count: usize,
    pub series: Vec<OverlayPoint>,
    pub seasonal_profile: Vec<SeasonalStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveReport {
    pub city: String,
    pub current_temperature: f64,
    pub verdict: LiveVerdict,
}

/// Holds at most one dataset. Loading identical bytes reuses it; loading
/// different bytes replaces it along with its baselines. A failed load of new
/// bytes clears the session, so no answer comes from the previous dataset.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Dataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, raw: &[u8]) -> std::result::Result<&Dataset, DataError> {
        let id = DatasetId::of(raw);
        if self.dataset.as_ref().map_or(false, |d| d.id == id) {
            debug!(dataset = %id, "Dataset unchanged, reusing cached stats");
        } else {
            self.dataset = None;
            self.dataset = Some(Dataset::from_raw(raw)?);
        }
        self.require_dataset()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    fn require_dataset(&self) -> std::result::Result<&Dataset, DataError> {
        self.dataset
            .as_ref()
            .ok_or_else(|| DataError::MalformedInput("no dataset loaded".to_string()))
    }

    pub fn city_report(&self, city: &str, params: &AnalysisParams) -> Result<CityReport> {
        params.validate()?;
        let dataset = self.require_dataset()?;
        let series = store::city_series(&dataset.records, city);

        let temps: Vec<f64> = series.iter().map(|r| r.temperature).collect();
        let points: Vec<(NaiveDateTime, f64)> =
            series.iter().map(|r| (r.timestamp, r.temperature)).collect();
        let rolling = smooth(&points, params.rolling_window)?;
        let historical = classify_historical(&series);
        let band = historical.band;

        let series: Vec<OverlayPoint> = series
            .iter()
            .zip(rolling)
            .map(|(r, p)| OverlayPoint {
                timestamp: r.timestamp,
                temperature: r.temperature,
                rolling_mean: p.rolling_mean,
                is_anomaly: band.map_or(false, |b| b.is_anomaly(r.temperature)),
            })
            .collect();

        Ok(CityReport {
            city: city.to_string(),
            summary: describe(&temps),
            band,
            anomaly_count: historical.anomalies.len(),
            series,
            seasonal_profile: dataset
                .seasonal
                .for_city(city)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Fetch the live reading and classify it against `month`'s baseline.
    /// Weather failures come back as `WeatherError` and leave the session intact.
    pub fn check_live(
        &self,
        city: &str,
        source: &dyn TemperatureSource,
        credential: &str,
        month: u32,
    ) -> Result<std::result::Result<LiveReport, WeatherError>> {
        let dataset = self.require_dataset()?;
        let current_temperature = match source.current_temperature(city, credential) {
            Ok(t) => t,
            Err(e) => return Ok(Err(e)),
        };
        let verdict = classify_live(city, current_temperature, &dataset.seasonal, month)?;
        Ok(Ok(LiveReport {
            city: city.to_string(),
            current_temperature,
            verdict,
        }))
    }
}
