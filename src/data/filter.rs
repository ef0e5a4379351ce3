use super::model::{DailySeries, FilterResult};

// ---------------------------------------------------------------------------
// Range filter
// ---------------------------------------------------------------------------

/// Return the days whose mean temperature lies in `[lo, hi]` (inclusive).
///
/// Comparison uses full precision. An inverted range (`lo > hi`) or a NaN
/// bound matches nothing; that is an empty result, not an error.
pub fn filter_range(series: &DailySeries, lo: f64, hi: f64) -> FilterResult {
    let days = series
        .days()
        .iter()
        .filter(|d| d.mean_temperature >= lo && d.mean_temperature <= hi)
        .copied()
        .collect();
    FilterResult { lo, hi, days }
}

// ---------------------------------------------------------------------------
// Range selection state (slider bounds)
// ---------------------------------------------------------------------------

/// Round to one decimal, half away from zero.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Slider limits and the initial selection derived from a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    /// Lowest selectable value.
    pub min: f64,
    /// Highest selectable value.
    pub max: f64,
    /// Initial (lo, hi) selection.
    pub initial: (f64, f64),
}

impl RangeBounds {
    /// Limits are the series extent widened by `padding` on each side;
    /// the initial selection is the extent itself. All rounded to 0.1.
    pub fn from_series(series: &DailySeries, padding: f64) -> Self {
        let (lo, hi) = series.temperature_extent();
        RangeBounds {
            min: round1(lo - padding),
            max: round1(hi + padding),
            initial: (round1(lo), round1(hi)),
        }
    }

    /// Pull a previous selection back inside the limits.
    pub fn clamp(&self, selection: (f64, f64)) -> (f64, f64) {
        let lo = selection.0.clamp(self.min, self.max);
        let hi = selection.1.clamp(self.min, self.max);
        (lo, hi)
    }
}
