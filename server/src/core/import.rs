//! Catalog seed import
//!
//! Loads attributes, their ordered term labels, and products with term
//! assignments from a JSON seed into the catalog store. Re-importing the same
//! seed updates labels and term positions in place; products are always
//! created anew.

use std::path::Path;

use anyhow::Context;

use crate::data::error::DataError;
use crate::data::traits::CatalogRepository;
use crate::data::types::{AttributeSeed, CatalogSeed, is_valid_attribute_name};

/// Counts reported after an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub attributes: usize,
    pub terms: usize,
    pub products: usize,
    pub assignments: usize,
}

/// Read and parse a seed file
pub fn read_seed(path: &Path) -> anyhow::Result<CatalogSeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))
}

fn default_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn validate_attribute(seed: &AttributeSeed) -> Result<(), DataError> {
    if !is_valid_attribute_name(&seed.name) {
        return Err(DataError::Config(format!(
            "invalid attribute name '{}'",
            seed.name
        )));
    }
    Ok(())
}

/// Write a seed into the catalog
pub async fn import_catalog(
    repo: &dyn CatalogRepository,
    seed: &CatalogSeed,
) -> Result<ImportSummary, DataError> {
    let mut summary = ImportSummary::default();

    for attr in &seed.attributes {
        validate_attribute(attr)?;
        let label = attr
            .label
            .clone()
            .unwrap_or_else(|| default_label(&attr.name));
        let row = repo.upsert_attribute(&attr.name, &label).await?;
        summary.attributes += 1;

        for (position, term) in attr.terms.iter().enumerate() {
            repo.upsert_term(row.id, term, position as i64).await?;
            summary.terms += 1;
        }
        tracing::debug!(attribute = %attr.name, terms = attr.terms.len(), "Imported attribute");
    }

    for product in &seed.products {
        let row = repo.create_product(&product.name).await?;
        summary.products += 1;

        for (attribute, labels) in &product.terms {
            for label in labels {
                let term = repo
                    .get_term_by_name(attribute, label)
                    .await?
                    .ok_or_else(|| {
                        DataError::NotFound(format!(
                            "term '{}' of attribute '{}' (product '{}')",
                            label, attribute, product.name
                        ))
                    })?;
                if repo.assign_term(row.id, term.id).await? {
                    summary.assignments += 1;
                }
            }
        }
    }

    tracing::debug!(?summary, "Catalog import finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::listing::ListingQuery;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::schema::SCHEMA;

    async fn setup_repo() -> Arc<dyn CatalogRepository> {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        Arc::new(Arc::new(SqliteService::from_pool(pool)))
    }

    fn seed(json: &str) -> CatalogSeed {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_import_catalog() {
        let repo = setup_repo().await;
        let seed = seed(
            r#"{
                "attributes": [
                    {"name": "weight", "terms": ["1", "5", "9"]},
                    {"name": "size", "label": "Bag size", "terms": ["1/2", "3/4"]}
                ],
                "products": [
                    {"name": "Light", "terms": {"weight": ["1"], "size": ["1/2"]}},
                    {"name": "Heavy", "terms": {"weight": ["9"]}}
                ]
            }"#,
        );

        let summary = import_catalog(repo.as_ref(), &seed).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                attributes: 2,
                terms: 5,
                products: 2,
                assignments: 3,
            }
        );

        let weight = repo.get_attribute("weight").await.unwrap().unwrap();
        assert_eq!(weight.label, "Weight");
        let size = repo.get_attribute("size").await.unwrap().unwrap();
        assert_eq!(size.label, "Bag size");

        let names: Vec<String> = repo
            .list_terms("weight")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["1", "5", "9"]);

        let (_, total) = repo.list_products(&ListingQuery::new(1, 10)).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_reimport_keeps_terms_unique() {
        let repo = setup_repo().await;
        let seed = seed(r#"{"attributes": [{"name": "weight", "terms": ["1", "5"]}]}"#);

        import_catalog(repo.as_ref(), &seed).await.unwrap();
        import_catalog(repo.as_ref(), &seed).await.unwrap();

        assert_eq!(repo.list_attributes().await.unwrap().len(), 1);
        assert_eq!(repo.list_terms("weight").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_term_fails() {
        let repo = setup_repo().await;
        let seed = seed(
            r#"{
                "attributes": [{"name": "weight", "terms": ["1"]}],
                "products": [{"name": "Odd", "terms": {"weight": ["7"]}}]
            }"#,
        );

        let err = import_catalog(repo.as_ref(), &seed).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_attribute_name_fails() {
        let repo = setup_repo().await;
        let seed = seed(r#"{"attributes": [{"name": "net weight", "terms": []}]}"#);

        let err = import_catalog(repo.as_ref(), &seed).await.unwrap_err();
        assert!(matches!(err, DataError::Config(_)));
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label("weight"), "Weight");
        assert_eq!(default_label(""), "");
    }

    #[test]
    fn test_read_seed_reports_path() {
        let err = read_seed(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/seed.json"));
    }
}
