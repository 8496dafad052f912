use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

/// Northern-hemisphere calendar mapping, indexed by `month - 1`.
const MONTH_TO_SEASON: [Season; 12] = [
    Season::Winter,
    Season::Winter,
    Season::Spring,
    Season::Spring,
    Season::Spring,
    Season::Summer,
    Season::Summer,
    Season::Summer,
    Season::Autumn,
    Season::Autumn,
    Season::Autumn,
    Season::Winter,
];

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    pub fn from_month(month: u32) -> Result<Season, DataError> {
        match month {
            1..=12 => Ok(MONTH_TO_SEASON[(month - 1) as usize]),
            _ => Err(DataError::InvalidMonth(month)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row of the historical dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRecord {
    pub city: String,
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub season: Season,
}

/// Per-(city, season) baseline. `seasonal_std` is `None` for single-point groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalStat {
    pub city: String,
    pub season: Season,
    pub seasonal_mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_std: Option<f64>,
    pub count: usize,
}

impl SeasonalStat {
    /// Band for this baseline, or `None` when no std is available.
    pub fn band(&self) -> Option<AnomalyBand> {
        self.seasonal_std
            .map(|s| AnomalyBand::around(self.seasonal_mean, s))
    }
}

/// Closed interval `[mean - 2σ, mean + 2σ]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyBand {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl AnomalyBand {
    pub const SIGMAS: f64 = 2.0;

    pub fn around(mean: f64, std: f64) -> Self {
        AnomalyBand {
            lower_bound: mean - Self::SIGMAS * std,
            upper_bound: mean + Self::SIGMAS * std,
        }
    }

    /// Bounds are inclusive: a value sitting exactly on a bound is normal.
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }

    pub fn is_anomaly(&self, value: f64) -> bool {
        !self.contains(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub timestamp: NaiveDateTime,
    pub rolling_mean: Option<f64>,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 style timestamp. Offsets are dropped in favour of the
/// local wall-clock time so the calendar month matches what the row says.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(crate) fn deserialize_timestamp<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(1).unwrap(), Season::Winter);
        assert_eq!(Season::from_month(2).unwrap(), Season::Winter);
        assert_eq!(Season::from_month(3).unwrap(), Season::Spring);
        assert_eq!(Season::from_month(5).unwrap(), Season::Spring);
        assert_eq!(Season::from_month(7).unwrap(), Season::Summer);
        assert_eq!(Season::from_month(9).unwrap(), Season::Autumn);
        assert_eq!(Season::from_month(11).unwrap(), Season::Autumn);
        assert_eq!(Season::from_month(12).unwrap(), Season::Winter);
    }

    #[test]
    fn test_season_rejects_out_of_range_month() {
        assert!(matches!(Season::from_month(0), Err(DataError::InvalidMonth(0))));
        assert!(matches!(Season::from_month(13), Err(DataError::InvalidMonth(13))));
    }

    #[test]
    fn test_every_month_maps_to_one_season() {
        for month in 1..=12 {
            let season = Season::from_month(month).unwrap();
            assert!(Season::ALL.contains(&season));
        }
    }

    #[test]
    fn test_band_bounds_are_inclusive() {
        let band = AnomalyBand::around(20.0, 5.0);
        assert_eq!(band.lower_bound, 10.0);
        assert_eq!(band.upper_bound, 30.0);
        assert!(!band.is_anomaly(10.0));
        assert!(!band.is_anomaly(30.0));
        assert!(band.is_anomaly(30.01));
        assert!(band.is_anomaly(9.99));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let d = parse_timestamp("2021-07-04").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2021, 7, 4));

        let d = parse_timestamp("2021-07-04 13:45:00").unwrap();
        assert_eq!(d.month(), 7);

        let d = parse_timestamp("2021-07-04T13:45:00.250").unwrap();
        assert_eq!(d.month(), 7);

        let d = parse_timestamp("2021-12-31T23:30:00-05:00").unwrap();
        assert_eq!((d.month(), d.day()), (12, 31));

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2021-13-01").is_none());
    }

    #[test]
    fn test_season_serializes_lowercase() {
        let json = serde_json::to_string(&Season::Autumn).unwrap();
        assert_eq!(json, "\"autumn\"");
    }
}
