//! Catalog row types and import seed format

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable identifier of an attribute term
pub type TermId = i64;

/// Prefix turning a bare attribute name into its taxonomy name
pub const TAXONOMY_PREFIX: &str = "pa_";

/// Attribute names appear in query keys and URLs: 1-64 chars, alphanumeric
/// plus dash and underscore
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// Attribute types
// ============================================================================

/// Product attribute (a catalog facet such as `weight`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeRow {
    pub id: i64,
    /// Bare name used in query keys (`weight`)
    pub name: String,
    /// Human-readable label (`Weight`)
    pub label: String,
}

impl AttributeRow {
    pub fn taxonomy(&self) -> String {
        format!("{}{}", TAXONOMY_PREFIX, self.name)
    }
}

/// One discrete value of an attribute. The label is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermRow {
    pub id: TermId,
    pub attribute_id: i64,
    pub name: String,
}

// ============================================================================
// Product types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Term assigned to a product, joined with its attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductTermRow {
    pub attribute_name: String,
    pub attribute_label: String,
    pub term_id: TermId,
    pub term_name: String,
}

// ============================================================================
// Widget types
// ============================================================================

/// Persisted configuration of one slider widget instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WidgetRow {
    pub id: String,
    pub title: String,
    pub attribute_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============================================================================
// Import seed
// ============================================================================

/// JSON document accepted by `catalog import`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub attributes: Vec<AttributeSeed>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSeed {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    pub name: String,
    /// Attribute name to assigned term labels
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_attribute_name() {
        assert!(is_valid_attribute_name("weight"));
        assert!(is_valid_attribute_name("net_weight"));
        assert!(is_valid_attribute_name("size-eu"));
        assert!(!is_valid_attribute_name(""));
        assert!(!is_valid_attribute_name("net weight"));
        assert!(!is_valid_attribute_name("a/b"));
        assert!(!is_valid_attribute_name(&"x".repeat(65)));
    }

    #[test]
    fn test_attribute_taxonomy() {
        let attr = AttributeRow {
            id: 1,
            name: "weight".to_string(),
            label: "Weight".to_string(),
        };
        assert_eq!(attr.taxonomy(), "pa_weight");
    }

    #[test]
    fn test_seed_deserialize() {
        let json = r#"{
            "attributes": [{"name": "weight", "terms": ["1", "1/2"]}],
            "products": [{"name": "Bag", "terms": {"weight": ["1/2"]}}]
        }"#;
        let seed: CatalogSeed = serde_json::from_str(json).unwrap();
        assert_eq!(seed.attributes[0].terms, vec!["1", "1/2"]);
        assert_eq!(seed.attributes[0].label, None);
        assert_eq!(seed.products[0].terms["weight"], vec!["1/2"]);
    }

    #[test]
    fn test_seed_rejects_unknown_fields() {
        let json = r#"{"attributes": [], "categories": []}"#;
        assert!(serde_json::from_str::<CatalogSeed>(json).is_err());
    }
}
