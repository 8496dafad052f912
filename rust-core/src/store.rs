//! Historical dataset loading: CSV bytes -> normalized, season-tagged records.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::models::{deserialize_timestamp, Season, TemperatureRecord};

pub const REQUIRED_COLUMNS: [&str; 3] = ["city", "timestamp", "temperature"];

/// Content identity of a raw dataset (SHA-256 of its bytes, hex encoded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn of(raw: &[u8]) -> Self {
        DatasetId(format!("{:x}", Sha256::digest(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0[..12.min(self.0.len())])
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    city: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: NaiveDateTime,
    temperature: f64,
}

/// Parse a CSV dataset. Any bad row fails the whole load.
pub fn load(raw: &[u8]) -> std::result::Result<Vec<TemperatureRecord>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw);

    let headers = reader
        .headers()
        .map_err(|e| DataError::MalformedInput(format!("unreadable header: {}", e)))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MalformedInput(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        let row = row.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            DataError::MalformedInput(format!("line {}: {}", line, e))
        })?;
        if !row.temperature.is_finite() {
            return Err(DataError::MalformedInput(format!(
                "non-finite temperature for {} at {}",
                row.city, row.timestamp
            )));
        }
        let season = Season::from_month(row.timestamp.month())?;
        records.push(TemperatureRecord {
            city: row.city,
            timestamp: row.timestamp,
            temperature: row.temperature,
            season,
        });
    }

    debug!(rows = records.len(), "Parsed dataset");
    Ok(records)
}

pub fn load_path(path: &Path) -> Result<(DatasetId, Vec<TemperatureRecord>)> {
    let raw = std::fs::read(path)?;
    let id = DatasetId::of(&raw);
    let records = load(&raw)?;
    info!(path = %path.display(), dataset = %id, rows = records.len(), "Loaded dataset");
    Ok((id, records))
}

/// Sorted, de-duplicated city names.
pub fn cities(records: &[TemperatureRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.city.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Records for one city, in file order.
pub fn city_series<'a>(
    records: &'a [TemperatureRecord],
    city: &str,
) -> Vec<&'a TemperatureRecord> {
    records.iter().filter(|r| r.city == city).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "city,timestamp,temperature\n\
                          Berlin,2020-01-15,1.5\n\
                          Berlin,2020-07-15,22.0\n\
                          Cairo,2020-04-01,25.25\n";

    #[test]
    fn test_load_derives_season() {
        let records = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].season, Season::Winter);
        assert_eq!(records[1].season, Season::Summer);
        assert_eq!(records[2].season, Season::Spring);
        assert_eq!(records[2].temperature, 25.25);
    }

    #[test]
    fn test_load_ignores_extra_columns_and_order() {
        let raw = "temperature,station,timestamp,city\n3.0,A1,2019-10-02 08:00:00,Oslo\n";
        let records = load(raw.as_bytes()).unwrap();
        assert_eq!(records[0].city, "Oslo");
        assert_eq!(records[0].season, Season::Autumn);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let raw = "city,timestamp\nOslo,2020-01-01\n";
        let err = load(raw.as_bytes()).unwrap_err();
        match err {
            DataError::MalformedInput(msg) => assert!(msg.contains("temperature")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_values_fail_whole_load() {
        let bad_temp = "city,timestamp,temperature\nOslo,2020-01-01,1.0\nOslo,2020-01-02,warm\n";
        assert!(matches!(
            load(bad_temp.as_bytes()),
            Err(DataError::MalformedInput(_))
        ));

        let bad_ts = "city,timestamp,temperature\nOslo,not-a-date,1.0\n";
        assert!(matches!(
            load(bad_ts.as_bytes()),
            Err(DataError::MalformedInput(_))
        ));

        let nan = "city,timestamp,temperature\nOslo,2020-01-01,NaN\n";
        assert!(matches!(load(nan.as_bytes()), Err(DataError::MalformedInput(_))));
    }

    #[test]
    fn test_load_is_deterministic() {
        let a = load(SAMPLE.as_bytes()).unwrap();
        let b = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(a, b);
        assert_eq!(DatasetId::of(SAMPLE.as_bytes()), DatasetId::of(SAMPLE.as_bytes()));
        assert_ne!(DatasetId::of(SAMPLE.as_bytes()), DatasetId::of(b"city"));
    }

    #[test]
    fn test_cities_sorted_unique() {
        let records = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(cities(&records), vec!["Berlin".to_string(), "Cairo".to_string()]);
        assert_eq!(city_series(&records, "Berlin").len(), 2);
        assert!(city_series(&records, "Paris").is_empty());
    }

    #[test]
    fn test_load_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let (id, records) = load_path(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(id, DatasetId::of(SAMPLE.as_bytes()));
    }
}
