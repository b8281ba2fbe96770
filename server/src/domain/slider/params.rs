//! Request parameters and slider key discovery
//!
//! Each slider submits `<attribute>_min_value` and `<attribute>_max_value`.
//! The filter compiler pairs those keys up per attribute.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix of the lower-bound query key
pub const MIN_VALUE_SUFFIX: &str = "_min_value";

/// Suffix of the upper-bound query key
pub const MAX_VALUE_SUFFIX: &str = "_max_value";

/// Query key carrying the lower bound for an attribute
pub fn min_value_key(attribute: &str) -> String {
    format!("{}{}", attribute, MIN_VALUE_SUFFIX)
}

/// Query key carrying the upper bound for an attribute
pub fn max_value_key(attribute: &str) -> String {
    format!("{}{}", attribute, MAX_VALUE_SUFFIX)
}

/// Flat, read-only view of the query string.
///
/// Keys keep the position of their first appearance; a repeated key takes
/// the last value, like a PHP-style `$_GET` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match params.pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => params.pairs.push((key, value)),
            }
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Whether the request carries either bound for the attribute
    pub fn has_bounds_for(&self, attribute: &str) -> bool {
        self.contains(&min_value_key(attribute)) || self.contains(&max_value_key(attribute))
    }

    /// Copy of the parameters without the given keys
    pub fn without(&self, excluded: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| !excluded.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// How an attribute name is recovered from a bound key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyParsing {
    /// Strip the `_min_value` / `_max_value` suffix; names may contain `_`
    #[default]
    Suffix,
    /// Historical behavior: keep everything before the first `_`, which
    /// truncates attribute names containing underscores
    FirstUnderscore,
}

impl fmt::Display for KeyParsing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParsing::Suffix => write!(f, "suffix"),
            KeyParsing::FirstUnderscore => write!(f, "first_underscore"),
        }
    }
}

impl KeyParsing {
    fn attribute_name<'a>(&self, key: &'a str, suffix: &str) -> Option<&'a str> {
        let stripped = key.strip_suffix(suffix)?;
        let name = match self {
            KeyParsing::Suffix => stripped,
            KeyParsing::FirstUnderscore => key.split('_').next().unwrap_or_default(),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// One attribute's requested bounds, looked up by the reconstructed keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderPair {
    pub attribute: String,
    pub min_raw: Option<String>,
    pub max_raw: Option<String>,
}

/// Bound keys found in a request, sorted by attribute name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderKeys {
    min_attributes: Vec<String>,
    max_attributes: Vec<String>,
}

impl SliderKeys {
    pub fn collect(params: &RequestParams, parsing: KeyParsing) -> Self {
        let mut min_attributes: Vec<String> = params
            .keys()
            .filter_map(|k| parsing.attribute_name(k, MIN_VALUE_SUFFIX))
            .map(str::to_string)
            .collect();
        let mut max_attributes: Vec<String> = params
            .keys()
            .filter_map(|k| parsing.attribute_name(k, MAX_VALUE_SUFFIX))
            .map(str::to_string)
            .collect();

        min_attributes.sort();
        max_attributes.sort();

        Self {
            min_attributes,
            max_attributes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_attributes.is_empty() && self.max_attributes.is_empty()
    }

    /// Attribute names referenced by any bound key
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.min_attributes
            .iter()
            .chain(self.max_attributes.iter())
            .map(String::as_str)
    }

    /// Pair min and max keys per attribute.
    ///
    /// Returns `None` when the request is malformed: the number of min keys
    /// differs from the number of max keys, or the sorted names disagree.
    pub fn pairs(&self, params: &RequestParams) -> Option<Vec<SliderPair>> {
        if self.min_attributes.len() != self.max_attributes.len() {
            tracing::debug!(
                min_keys = self.min_attributes.len(),
                max_keys = self.max_attributes.len(),
                "Unpaired slider bounds, no filter applied"
            );
            return None;
        }

        if let Some((min, max)) = self
            .min_attributes
            .iter()
            .zip(&self.max_attributes)
            .find(|(min, max)| min != max)
        {
            tracing::debug!(%min, %max, "Mismatched slider bounds, no filter applied");
            return None;
        }

        Some(
            self.min_attributes
                .iter()
                .map(|attribute| SliderPair {
                    attribute: attribute.clone(),
                    min_raw: params.get(&min_value_key(attribute)).map(str::to_string),
                    max_raw: params.get(&max_value_key(attribute)).map(str::to_string),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        RequestParams::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_repeated_key_takes_last_value_at_first_position() {
        let p = params(&[("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(p.get("a"), Some("3"));
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_without_removes_keys() {
        let p = params(&[("a", "1"), ("paged", "2"), ("b", "3")]);
        let rest = p.without(&["paged"]);
        assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_has_bounds_for() {
        let p = params(&[("weight_max_value", "8")]);
        assert!(p.has_bounds_for("weight"));
        assert!(!p.has_bounds_for("size"));
    }

    #[test]
    fn test_collect_sorts_by_attribute() {
        let p = params(&[
            ("size_min_value", "1"),
            ("weight_min_value", "2"),
            ("color", "red"),
            ("size_max_value", "4"),
            ("weight_max_value", "8"),
        ]);
        let keys = SliderKeys::collect(&p, KeyParsing::Suffix);
        let pairs = keys.pairs(&p).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].attribute, "size");
        assert_eq!(pairs[1].attribute, "weight");
        assert_eq!(pairs[1].min_raw.as_deref(), Some("2"));
        assert_eq!(pairs[1].max_raw.as_deref(), Some("8"));
    }

    #[test]
    fn test_unbalanced_counts_yield_no_pairs() {
        let p = params(&[
            ("a_min_value", "1"),
            ("b_min_value", "1"),
            ("c_min_value", "1"),
            ("a_max_value", "2"),
            ("b_max_value", "2"),
        ]);
        let keys = SliderKeys::collect(&p, KeyParsing::Suffix);
        assert!(keys.pairs(&p).is_none());
    }

    #[test]
    fn test_mismatched_names_yield_no_pairs() {
        let p = params(&[("a_min_value", "1"), ("b_max_value", "2")]);
        let keys = SliderKeys::collect(&p, KeyParsing::Suffix);
        assert!(keys.pairs(&p).is_none());
    }

    #[test]
    fn test_no_keys_yield_empty_pairs() {
        let p = params(&[("orderby", "price")]);
        let keys = SliderKeys::collect(&p, KeyParsing::Suffix);
        assert!(keys.is_empty());
        assert_eq!(keys.pairs(&p), Some(vec![]));
    }

    #[test]
    fn test_bare_suffix_is_not_a_slider_key() {
        let p = params(&[("_min_value", "1"), ("_max_value", "2")]);
        let keys = SliderKeys::collect(&p, KeyParsing::Suffix);
        assert!(keys.is_empty());
    }

    // Behavior-parity decision point for attribute names containing `_`.
    #[test]
    fn test_key_parsing_parity_underscore_names() {
        let p = params(&[("net_weight_min_value", "1"), ("net_weight_max_value", "5")]);

        let suffix = SliderKeys::collect(&p, KeyParsing::Suffix).pairs(&p).unwrap();
        assert_eq!(suffix[0].attribute, "net_weight");
        assert_eq!(suffix[0].min_raw.as_deref(), Some("1"));

        let legacy = SliderKeys::collect(&p, KeyParsing::FirstUnderscore)
            .pairs(&p)
            .unwrap();
        assert_eq!(legacy[0].attribute, "net");
        assert_eq!(legacy[0].min_raw, None);
        assert_eq!(legacy[0].max_raw, None);
    }

    #[test]
    fn test_key_parsing_modes_agree_without_underscores() {
        let p = params(&[("weight_min_value", "2"), ("weight_max_value", "8")]);
        assert_eq!(
            SliderKeys::collect(&p, KeyParsing::Suffix).pairs(&p),
            SliderKeys::collect(&p, KeyParsing::FirstUnderscore).pairs(&p)
        );
    }
}
