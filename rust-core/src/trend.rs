//! Trailing rolling-mean smoothing for the trend overlay.

use chrono::NaiveDateTime;

use crate::error::DataError;
use crate::models::RollingPoint;

pub const DEFAULT_WINDOW: usize = 30;

/// Rolling mean over the trailing `window` observations, in input order.
/// The first `window - 1` points have no value; no partial windows.
pub fn smooth(
    series: &[(NaiveDateTime, f64)],
    window: usize,
) -> Result<Vec<RollingPoint>, DataError> {
    if window == 0 {
        return Err(DataError::InvalidConfiguration {
            name: "rolling_window".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    // Sum each filled window directly; no running sum carried across windows.
    let out = series
        .iter()
        .enumerate()
        .map(|(i, &(timestamp, _))| RollingPoint {
            timestamp,
            rolling_mean: (i + 1 >= window).then(|| {
                series[i + 1 - window..=i].iter().map(|p| p.1).sum::<f64>() / window as f64
            }),
        })
        .collect();
    Ok(out)
}
