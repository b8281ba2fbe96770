//! Request bound resolution
//!
//! Bounds arriving on the query string are snapped outward onto the step
//! grid: the lower bound down, the upper bound up. Absent or unparseable
//! bounds fall back to the attribute's full range. Bounds are not clamped to
//! the range, so a stale link can select past either end. A bound that
//! overflows the grid arithmetic falls back to the range end.

use serde::Serialize;

use super::numeric::parse_numeric;
use super::range::SliderScale;

/// Resolved per-attribute bounds, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterBound {
    pub min_value: f64,
    pub max_value: f64,
}

impl FilterBound {
    /// Inclusive membership test used for term selection
    pub fn contains(&self, value: f64) -> bool {
        self.min_value <= value && value <= self.max_value
    }
}

/// Resolve the bounds for one attribute from raw request values
pub fn resolve_bounds(
    scale: &SliderScale,
    request_min: Option<&str>,
    request_max: Option<&str>,
) -> FilterBound {
    let step = scale.step.get();

    let min_value = request_min
        .and_then(parse_numeric)
        .map(|v| (v / step).floor() * step)
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| scale.range.min());

    let max_value = request_max
        .and_then(parse_numeric)
        .map(|v| (v / step).ceil() * step)
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| scale.range.max());

    FilterBound {
        min_value,
        max_value,
    }
}
