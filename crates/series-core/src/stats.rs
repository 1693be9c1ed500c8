// File: crates/series-core/src/stats.rs
// Summary: Quartile, median and whisker/outlier statistics for box-and-whisker series.

use serde::{Deserialize, Serialize};

/// How lower/upper quartiles are derived from a sorted sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuartileMethod {
    /// Rank `p*(n+1)`, interpolated.
    #[default]
    Exclusive,
    /// Rank `p*(n-1)`, interpolated.
    Inclusive,
    /// Median of the lower and upper halves.
    Normal,
}

/// Five-number summary plus mean and outliers for one box.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxStatistics {
    pub minimum: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub maximum: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxStatistics {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 { self.upper_quartile - self.lower_quartile }

    /// Lowest and highest values including outliers.
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.outliers.iter().fold(self.minimum, |a, &b| a.min(b));
        let hi = self.outliers.iter().fold(self.maximum, |a, &b| a.max(b));
        (lo, hi)
    }
}

/// Exclusive quartile at percentile `p` of a sorted slice.
pub fn exclusive_quartile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    match n {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }
    let rank = p * (n as f64 + 1.0);
    let k = rank.abs().trunc() as usize;
    let f = rank - k as f64;
    if k == 0 {
        sorted[0]
    } else if k > n - 1 {
        sorted[n - 1]
    } else {
        f * (sorted[k] - sorted[k - 1]) + sorted[k - 1]
    }
}

/// Inclusive quartile at percentile `p` of a sorted slice.
pub fn inclusive_quartile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    match n {
        0 => return 0.0,
        1 => return sorted[0],
        _ => {}
    }
    let rank = p * (n as f64 - 1.0);
    let k = rank.abs().trunc() as usize;
    let f = rank - k as f64;
    if k + 1 >= n {
        return sorted[n - 1];
    }
    f * (sorted[k + 1] - sorted[k]) + sorted[k]
}

/// Median with the pivot at `round(n/2)` (half away from zero).
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    // f64::round rounds half away from zero.
    let half = (n as f64 / 2.0).round() as usize;
    if n % 2 == 0 {
        (sorted[half - 1] + sorted[half]) / 2.0
    } else {
        sorted[half - 1]
    }
}

/// Lower and upper quartile of a sorted slice.
pub fn quartiles(sorted: &[f64], method: QuartileMethod) -> (f64, f64) {
    let n = sorted.len();
    if n <= 1 {
        let v = sorted.first().copied().unwrap_or(0.0);
        return (v, v);
    }
    match method {
        QuartileMethod::Exclusive => (exclusive_quartile(sorted, 0.25), exclusive_quartile(sorted, 0.75)),
        QuartileMethod::Inclusive => (inclusive_quartile(sorted, 0.25), inclusive_quartile(sorted, 0.75)),
        QuartileMethod::Normal => {
            let half = n / 2;
            let upper_start = if n % 2 == 0 { half } else { half + 1 };
            (median(&sorted[..half]), median(&sorted[upper_start..upper_start + half]))
        }
    }
}

/// Whisker bounds and outliers by the 1.5*IQR rule, scanning in from both ends.
/// Returns `(minimum, maximum, outliers)`.
pub fn whiskers(sorted: &[f64], lower_quartile: f64, upper_quartile: f64) -> (f64, f64, Vec<f64>) {
    let fence = 1.5 * (upper_quartile - lower_quartile);
    let mut outliers = Vec::new();
    let mut minimum = 0.0;
    let mut maximum = 0.0;
    for &v in sorted {
        if v < lower_quartile - fence {
            outliers.push(v);
        } else {
            minimum = v;
            break;
        }
    }
    for &v in sorted.iter().rev() {
        if v > upper_quartile + fence {
            outliers.push(v);
        } else {
            maximum = v;
            break;
        }
    }
    (minimum, maximum, outliers)
}

/// Full summary of an unsorted sample; NaN entries are dropped first.
pub fn box_statistics(samples: &[f64], method: QuartileMethod, show_outliers: bool) -> BoxStatistics {
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n == 0 {
        return BoxStatistics::default();
    }
    let (lower_quartile, upper_quartile) = quartiles(&sorted, method);
    let median = median(&sorted);
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let (minimum, maximum, outliers) = if show_outliers {
        whiskers(&sorted, lower_quartile, upper_quartile)
    } else {
        (sorted[0], sorted[n - 1], Vec::new())
    };
    BoxStatistics { minimum, lower_quartile, median, upper_quartile, maximum, mean, outliers }
}
