//! Shared data types for the catalog store
//!
//! Row types returned by the SQLite repositories and the seed format read by
//! the catalog importer.

mod catalog;

pub use catalog::{
    AttributeRow, AttributeSeed, CatalogSeed, ProductRow, ProductSeed, ProductTermRow,
    TAXONOMY_PREFIX, TermId, TermRow, WidgetRow, is_valid_attribute_name,
};
