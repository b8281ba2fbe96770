//! Repository traits for the catalog store
//!
//! Handlers and the slider request scope depend on these traits rather than
//! on the SQLite service, so tests can substitute an in-memory pool.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::listing::ListingQuery;
use crate::data::types::{AttributeRow, ProductRow, ProductTermRow, TermRow, WidgetRow};

// ============================================================================
// Catalog Repository Trait
// ============================================================================

/// Read and import operations over attributes, terms and products
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // ==================== Attribute Operations ====================

    async fn list_attributes(&self) -> Result<Vec<AttributeRow>, DataError>;

    async fn get_attribute(&self, name: &str) -> Result<Option<AttributeRow>, DataError>;

    async fn upsert_attribute(&self, name: &str, label: &str) -> Result<AttributeRow, DataError>;

    // ==================== Term Operations ====================

    /// Terms of an attribute in catalog order; empty for unknown attributes
    async fn list_terms(&self, attribute_name: &str) -> Result<Vec<TermRow>, DataError>;

    async fn get_term_by_name(
        &self,
        attribute_name: &str,
        term_name: &str,
    ) -> Result<Option<TermRow>, DataError>;

    async fn upsert_term(
        &self,
        attribute_id: i64,
        name: &str,
        position: i64,
    ) -> Result<TermRow, DataError>;

    // ==================== Product Operations ====================

    /// Execute a listing query, returning one page and the total match count
    async fn list_products(
        &self,
        query: &ListingQuery,
    ) -> Result<(Vec<ProductRow>, u64), DataError>;

    async fn get_product(&self, id: i64) -> Result<Option<ProductRow>, DataError>;

    async fn list_product_terms(&self, product_id: i64) -> Result<Vec<ProductTermRow>, DataError>;

    async fn create_product(&self, name: &str) -> Result<ProductRow, DataError>;

    async fn assign_term(&self, product_id: i64, term_id: i64) -> Result<bool, DataError>;
}

// ============================================================================
// Widget Repository Trait
// ============================================================================

/// Persistence of slider widget instances
#[async_trait]
pub trait WidgetRepository: Send + Sync {
    async fn list_widgets(&self) -> Result<Vec<WidgetRow>, DataError>;

    async fn get_widget(&self, id: &str) -> Result<Option<WidgetRow>, DataError>;

    async fn create_widget(&self, title: &str, attribute_name: &str)
    -> Result<WidgetRow, DataError>;

    async fn update_widget(
        &self,
        id: &str,
        title: &str,
        attribute_name: &str,
    ) -> Result<Option<WidgetRow>, DataError>;

    async fn delete_widget(&self, id: &str) -> Result<bool, DataError>;
}
