//! Range and step extraction from attribute terms
//!
//! The slider spans the numeric values found among an attribute's term
//! labels. Wide spans are widened to the enclosing multiples of ten, and the
//! step is the span divided evenly across the attribute's terms.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::types::TermRow;

use super::numeric::parse_numeric;

/// Spans wider than this are snapped outward to multiples of [`ROUNDING_GRID`]
pub const ROUNDING_THRESHOLD: f64 = 10.0;

/// Grid used when snapping a wide span
pub const ROUNDING_GRID: f64 = 10.0;

/// How the running minimum and maximum are tracked while scanning terms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremaTracking {
    /// Minimum and maximum are updated independently for every value
    #[default]
    Independent,
    /// Historical behavior: a value lowering the minimum is never considered
    /// for the maximum, and zero values are skipped entirely
    Legacy,
}

impl fmt::Display for ExtremaTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtremaTracking::Independent => write!(f, "independent"),
            ExtremaTracking::Legacy => write!(f, "legacy"),
        }
    }
}

/// Numeric span covered by an attribute's parseable terms. Always `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Build a range, rejecting empty, inverted, or non-finite spans
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min < max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Snap wide spans outward to the rounding grid
    fn rounded(self) -> Self {
        if self.span() > ROUNDING_THRESHOLD {
            Self {
                min: (self.min / ROUNDING_GRID).floor() * ROUNDING_GRID,
                max: (self.max / ROUNDING_GRID).ceil() * ROUNDING_GRID,
            }
        } else {
            self
        }
    }
}

/// Grid unit used to snap slider handles and request bounds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Step(f64);

impl Step {
    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// Step derivation needs at least one term to divide the span by
    #[error("Cannot derive a step for an attribute without terms")]
    NoTerms,
}

/// Extract the rounded range from term labels.
///
/// Returns `None` when no label parses or when all parseable labels share a
/// single value.
pub fn extract_range<'a, I>(labels: I, tracking: ExtremaTracking) -> Option<Range>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in labels.into_iter().filter_map(parse_numeric) {
        match tracking {
            ExtremaTracking::Independent => {
                min = min.min(value);
                max = max.max(value);
            }
            ExtremaTracking::Legacy => {
                if value == 0.0 {
                    continue;
                }
                if value < min {
                    min = value;
                } else if value > max {
                    max = value;
                }
            }
        }
    }

    Range::new(min, max).map(Range::rounded)
}

/// Derive the step from the range and the total number of terms (parseable
/// or not).
///
/// The step is the floored span-per-term. When that floors to zero, the
/// un-floored quotient is used so narrow fractional ranges still get a
/// positive grid.
pub fn derive_step(range: &Range, term_count: usize) -> Result<Step, ScaleError> {
    if term_count == 0 {
        return Err(ScaleError::NoTerms);
    }

    let per_term = range.span() / term_count as f64;
    let floored = per_term.floor();
    if floored >= 1.0 {
        Ok(Step(floored))
    } else {
        Ok(Step(per_term))
    }
}

/// Range, step, and term count for one attribute, computed once per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderScale {
    pub range: Range,
    pub step: Step,
    pub term_count: usize,
}

impl SliderScale {
    /// Compute the scale for an attribute's terms, or `None` when the
    /// attribute has no usable range
    pub fn compute(terms: &[TermRow], tracking: ExtremaTracking) -> Option<Self> {
        let range = extract_range(terms.iter().map(|t| t.name.as_str()), tracking)?;
        match derive_step(&range, terms.len()) {
            Ok(step) => Some(Self {
                range,
                step,
                term_count: terms.len(),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "No slider scale");
                None
            }
        }
    }
}
