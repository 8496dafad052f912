//! Small descriptive-statistics helpers shared by the analysis stages.

use serde::Serialize;

pub fn mean(vals: &[f64]) -> Option<f64> {
    if vals.is_empty() {
        return None;
    }
    Some(vals.iter().sum::<f64>() / vals.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two points.
pub fn sample_std(vals: &[f64]) -> Option<f64> {
    if vals.len() < 2 {
        return None;
    }
    let m = mean(vals)?;
    let sq_diff: f64 = vals.iter().map(|v| (v - m).powi(2)).sum();
    Some((sq_diff / (vals.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile over already sorted values.
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Column summary: count, mean, std, min, quartiles, max.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

pub fn describe(vals: &[f64]) -> Summary {
    let mut sorted = vals.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Summary {
        count: vals.len(),
        mean: mean(vals),
        std: sample_std(vals),
        min: sorted.first().copied(),
        p25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        p75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}
