//! Filter compiler
//!
//! Turns the slider bounds on the query string into a term filter for the
//! product listing. Each paired attribute contributes one leaf holding the
//! terms whose numeric value lies inside the resolved bounds; the leaves are
//! ANDed after whatever filter the listing already carried.

use crate::data::types::TermId;

use super::bounds::resolve_bounds;
use super::expression::FilterExpression;
use super::numeric::parse_numeric;
use super::params::{KeyParsing, SliderPair};
use super::range::ExtremaTracking;
use super::scope::RequestScope;

/// Compile the request's slider bounds into a listing filter.
///
/// Returns `None` when the request carries no slider keys or when its min and
/// max keys do not pair up. The caller then leaves the listing untouched.
pub fn compile(scope: &RequestScope, existing: Option<FilterExpression>) -> Option<FilterExpression> {
    let keys = scope.slider_keys();
    if keys.is_empty() {
        return None;
    }

    let pairs = keys.pairs(scope.params())?;
    let leaves: Vec<FilterExpression> = pairs.iter().map(|pair| compile_pair(scope, pair)).collect();

    let expr = FilterExpression::merge(existing, leaves);
    tracing::debug!(filter = ?expr, "Compiled slider filter");
    Some(expr)
}

fn compile_pair(scope: &RequestScope, pair: &SliderPair) -> FilterExpression {
    let Some(entry) = scope.attribute(&pair.attribute) else {
        tracing::debug!(attribute = %pair.attribute, "Slider bounds for unknown attribute");
        return FilterExpression::terms(pair.attribute.clone(), Vec::new());
    };
    let Some(scale) = entry.scale.as_ref() else {
        tracing::debug!(attribute = %pair.attribute, "Slider bounds for attribute without range");
        return FilterExpression::terms(pair.attribute.clone(), Vec::new());
    };

    let config = scope.config();

    // Truncated names look up keys that were never sent
    if config.key_parsing == KeyParsing::FirstUnderscore
        && (pair.min_raw.is_none() || pair.max_raw.is_none())
    {
        tracing::debug!(attribute = %pair.attribute, "Slider bounds not found under truncated name");
        return FilterExpression::terms(pair.attribute.clone(), Vec::new());
    }

    let skip_zero = config.extrema_tracking == ExtremaTracking::Legacy;
    let bound = resolve_bounds(scale, pair.min_raw.as_deref(), pair.max_raw.as_deref());
    let terms: Vec<TermId> = entry
        .terms
        .iter()
        .filter(|term| {
            parse_numeric(&term.name)
                .is_some_and(|v| !(skip_zero && v == 0.0) && bound.contains(v))
        })
        .map(|term| term.id)
        .collect();

    tracing::trace!(
        attribute = %pair.attribute,
        min_value = bound.min_value,
        max_value = bound.max_value,
        matched = terms.len(),
        "Slider bounds resolved"
    );
    FilterExpression::terms(pair.attribute.clone(), terms)
}
