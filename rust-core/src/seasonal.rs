//! Per-(city, season) temperature baselines.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Season, SeasonalStat, TemperatureRecord};
use crate::stats::{mean, sample_std};

/// Baselines for every (city, season) group present in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeasonalStats {
    rows: Vec<SeasonalStat>,
}

impl SeasonalStats {
    pub fn compute(records: &[TemperatureRecord]) -> Self {
        // (city, season) -> temperatures
        let mut groups: BTreeMap<(&str, Season), Vec<f64>> = BTreeMap::new();
        for r in records {
            groups
                .entry((r.city.as_str(), r.season))
                .or_default()
                .push(r.temperature);
        }

        let rows: Vec<SeasonalStat> = groups
            .into_iter()
            .filter_map(|((city, season), temps)| {
                Some(SeasonalStat {
                    city: city.to_string(),
                    season,
                    seasonal_mean: mean(&temps)?,
                    seasonal_std: sample_std(&temps),
                    count: temps.len(),
                })
            })
            .collect();

        debug!(groups = rows.len(), "Computed seasonal stats");
        SeasonalStats { rows }
    }

    pub fn get(&self, city: &str, season: Season) -> Option<&SeasonalStat> {
        self.rows
            .iter()
            .find(|s| s.city == city && s.season == season)
    }

    /// Seasonal profile of one city, winter through autumn.
    pub fn for_city(&self, city: &str) -> Vec<&SeasonalStat> {
        self.rows.iter().filter(|s| s.city == city).collect()
    }

    pub fn rows(&self) -> &[SeasonalStat] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
