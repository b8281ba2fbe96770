//! Request-scoped slider state
//!
//! One [`RequestScope`] is built per storefront request. It holds the query
//! parameters and, for every attribute the request or a widget refers to,
//! the attribute record, its terms, and the computed scale. The filter
//! compiler and every widget render read the same scope, so a scale is
//! computed once per attribute per request.

use std::collections::HashMap;

use crate::core::config::SliderConfig;
use crate::data::error::DataError;
use crate::data::traits::CatalogRepository;
use crate::data::types::{AttributeRow, TermRow};

use super::params::{RequestParams, SliderKeys};
use super::range::SliderScale;

/// Catalog data for one attribute
#[derive(Debug, Clone)]
pub struct AttributeScale {
    pub attribute: AttributeRow,
    pub terms: Vec<TermRow>,
    /// `None` when the terms do not span a usable range
    pub scale: Option<SliderScale>,
}

impl AttributeScale {
    pub fn new(attribute: AttributeRow, terms: Vec<TermRow>, config: &SliderConfig) -> Self {
        let scale = SliderScale::compute(&terms, config.extrema_tracking);
        Self {
            attribute,
            terms,
            scale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestScope {
    params: RequestParams,
    config: SliderConfig,
    attributes: HashMap<String, AttributeScale>,
}

impl RequestScope {
    /// Load every attribute referenced by a bound key or by `widget_attributes`
    pub async fn load(
        repo: &dyn CatalogRepository,
        params: RequestParams,
        config: SliderConfig,
        widget_attributes: &[&str],
    ) -> Result<Self, DataError> {
        let keys = SliderKeys::collect(&params, config.key_parsing);

        let mut names: Vec<&str> = keys.attributes().chain(widget_attributes.iter().copied()).collect();
        names.sort_unstable();
        names.dedup();

        let mut attributes = HashMap::with_capacity(names.len());
        for name in names {
            let Some(attribute) = repo.get_attribute(name).await? else {
                tracing::debug!(attribute = name, "Unknown slider attribute");
                continue;
            };
            let terms = repo.list_terms(name).await?;
            let entry = AttributeScale::new(attribute, terms, &config);
            tracing::trace!(
                attribute = name,
                terms = entry.terms.len(),
                scale = ?entry.scale,
                "Slider attribute loaded"
            );
            attributes.insert(name.to_string(), entry);
        }

        Ok(Self {
            params,
            config,
            attributes,
        })
    }

    /// Build a scope from already loaded attributes
    pub fn from_parts(
        params: RequestParams,
        config: SliderConfig,
        attributes: impl IntoIterator<Item = AttributeScale>,
    ) -> Self {
        Self {
            params,
            config,
            attributes: attributes
                .into_iter()
                .map(|a| (a.attribute.name.clone(), a))
                .collect(),
        }
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn slider_keys(&self) -> SliderKeys {
        SliderKeys::collect(&self.params, self.config.key_parsing)
    }

    /// Catalog data for an attribute, `None` when it does not exist
    pub fn attribute(&self, name: &str) -> Option<&AttributeScale> {
        self.attributes.get(name)
    }

    pub fn scale(&self, name: &str) -> Option<&SliderScale> {
        self.attribute(name).and_then(|a| a.scale.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::schema::SCHEMA;
    use crate::domain::slider::ExtremaTracking;

    async fn setup_repo() -> Arc<dyn CatalogRepository> {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        let repo: Arc<dyn CatalogRepository> = Arc::new(Arc::new(SqliteService::from_pool(pool)));

        let weight = repo.upsert_attribute("weight", "Weight").await.unwrap();
        for (i, label) in ["1", "5", "9"].iter().enumerate() {
            repo.upsert_term(weight.id, label, i as i64).await.unwrap();
        }
        let size = repo.upsert_attribute("size", "Size").await.unwrap();
        repo.upsert_term(size.id, "large", 0).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_load_collects_key_and_widget_attributes() {
        let repo = setup_repo().await;
        let params =
            RequestParams::from_pairs([("weight_min_value", "2"), ("weight_max_value", "8")]);

        let scope = RequestScope::load(repo.as_ref(), params, SliderConfig::default(), &["size"])
            .await
            .unwrap();

        let weight = scope.scale("weight").unwrap();
        assert_eq!(weight.range.min(), 1.0);
        assert_eq!(weight.range.max(), 9.0);
        assert_eq!(weight.term_count, 3);

        let size = scope.attribute("size").unwrap();
        assert_eq!(size.terms.len(), 1);
        assert!(size.scale.is_none());
    }

    #[tokio::test]
    async fn test_load_skips_unknown_attributes() {
        let repo = setup_repo().await;
        let params =
            RequestParams::from_pairs([("color_min_value", "2"), ("color_max_value", "8")]);

        let scope = RequestScope::load(repo.as_ref(), params, SliderConfig::default(), &[])
            .await
            .unwrap();

        assert!(scope.attribute("color").is_none());
        assert!(scope.attribute("weight").is_none());
    }

    #[test]
    fn test_from_parts_uses_configured_tracking() {
        let config = SliderConfig {
            extrema_tracking: ExtremaTracking::Legacy,
            ..Default::default()
        };
        let attribute = AttributeRow {
            id: 1,
            name: "weight".to_string(),
            label: "Weight".to_string(),
        };
        // Descending labels never raise the legacy maximum
        let terms = ["9", "5", "1"]
            .iter()
            .enumerate()
            .map(|(i, name)| TermRow {
                id: i as i64 + 1,
                attribute_id: 1,
                name: name.to_string(),
            })
            .collect();

        let scope = RequestScope::from_parts(
            RequestParams::default(),
            config,
            [AttributeScale::new(attribute, terms, &config)],
        );
        assert!(scope.scale("weight").is_none());
        assert_eq!(scope.config().extrema_tracking, ExtremaTracking::Legacy);
    }
}
