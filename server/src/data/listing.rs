//! Product listing query
//!
//! A bag of named query variables handed through the listing pipeline.
//! Collaborators attach their contribution with `set`; the repository reads
//! the typed helpers when it executes the query and records the result count.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::slider::FilterExpression;

/// Query variable holding the filter expression
pub const QUERY_VAR_FILTER: &str = "filter";

/// Query variable holding the 1-based page number
pub const QUERY_VAR_PAGE: &str = "paged";

/// Query variable holding the page size
pub const QUERY_VAR_PER_PAGE: &str = "per_page";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryVar {
    Int(i64),
    Text(String),
    Filter(FilterExpression),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingQuery {
    vars: BTreeMap<String, QueryVar>,
    found: Option<u64>,
}

impl ListingQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        let mut query = Self::default();
        query.set(QUERY_VAR_PAGE, QueryVar::Int(page.max(1) as i64));
        query.set(QUERY_VAR_PER_PAGE, QueryVar::Int(per_page.max(1) as i64));
        query
    }

    pub fn get(&self, field: &str) -> Option<&QueryVar> {
        self.vars.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: QueryVar) {
        self.vars.insert(field.into(), value);
    }

    /// Filter expression currently attached, if any
    pub fn filter(&self) -> Option<&FilterExpression> {
        match self.get(QUERY_VAR_FILTER) {
            Some(QueryVar::Filter(expr)) => Some(expr),
            _ => None,
        }
    }

    pub fn set_filter(&mut self, expr: FilterExpression) {
        self.set(QUERY_VAR_FILTER, QueryVar::Filter(expr));
    }

    pub fn page(&self) -> u32 {
        self.int_var(QUERY_VAR_PAGE).unwrap_or(1)
    }

    pub fn per_page(&self) -> u32 {
        self.int_var(QUERY_VAR_PER_PAGE).unwrap_or(1)
    }

    pub fn offset(&self) -> u32 {
        self.page().saturating_sub(1).saturating_mul(self.per_page())
    }

    /// Total matching products, recorded after execution
    pub fn found(&self) -> Option<u64> {
        self.found
    }

    pub fn set_found(&mut self, total: u64) {
        self.found = Some(total);
    }

    fn int_var(&self, field: &str) -> Option<u32> {
        match self.get(field) {
            Some(QueryVar::Int(v)) => u32::try_from(*v).ok().filter(|v| *v > 0),
            Some(QueryVar::Text(s)) => s.parse::<u32>().ok().filter(|v| *v > 0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_paging() {
        let query = ListingQuery::new(3, 12);
        assert_eq!(query.page(), 3);
        assert_eq!(query.per_page(), 12);
        assert_eq!(query.offset(), 24);
        assert_eq!(query.found(), None);
    }

    #[test]
    fn test_zero_page_is_first_page() {
        let query = ListingQuery::new(0, 10);
        assert_eq!(query.page(), 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_generic_get_set() {
        let mut query = ListingQuery::new(1, 10);
        query.set("orderby", QueryVar::Text("price".to_string()));
        assert_eq!(
            query.get("orderby"),
            Some(&QueryVar::Text("price".to_string()))
        );
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn test_text_page_var_is_parsed() {
        let mut query = ListingQuery::new(1, 10);
        query.set(QUERY_VAR_PAGE, QueryVar::Text("4".to_string()));
        assert_eq!(query.page(), 4);
        query.set(QUERY_VAR_PAGE, QueryVar::Text("x".to_string()));
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_filter_roundtrip_through_vars() {
        let mut query = ListingQuery::new(1, 10);
        assert!(query.filter().is_none());

        let expr = FilterExpression::and(vec![FilterExpression::terms("weight", vec![1])]);
        query.set_filter(expr.clone());
        assert_eq!(query.filter(), Some(&expr));
    }

    #[test]
    fn test_found_is_recorded() {
        let mut query = ListingQuery::new(1, 10);
        query.set_found(42);
        assert_eq!(query.found(), Some(42));
    }
}
