//! Repository trait implementations for SQLite
//!
//! Implements `CatalogRepository` and `WidgetRepository` for
//! `Arc<SqliteService>` by delegating to the repository functions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::listing::ListingQuery;
use crate::data::traits::{CatalogRepository, WidgetRepository};
use crate::data::types::{AttributeRow, ProductRow, ProductTermRow, TermRow, WidgetRow};

use super::SqliteService;
use super::repositories::{attribute, product, term, widget};

#[async_trait]
impl CatalogRepository for Arc<SqliteService> {
    // ==================== Attribute Operations ====================

    async fn list_attributes(&self) -> Result<Vec<AttributeRow>, DataError> {
        attribute::list_attributes(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn get_attribute(&self, name: &str) -> Result<Option<AttributeRow>, DataError> {
        attribute::get_attribute(self.pool(), name)
            .await
            .map_err(Into::into)
    }

    async fn upsert_attribute(&self, name: &str, label: &str) -> Result<AttributeRow, DataError> {
        attribute::upsert_attribute(self.pool(), name, label)
            .await
            .map_err(Into::into)
    }

    // ==================== Term Operations ====================

    async fn list_terms(&self, attribute_name: &str) -> Result<Vec<TermRow>, DataError> {
        term::list_terms(self.pool(), attribute_name)
            .await
            .map_err(Into::into)
    }

    async fn get_term_by_name(
        &self,
        attribute_name: &str,
        term_name: &str,
    ) -> Result<Option<TermRow>, DataError> {
        term::get_term_by_name(self.pool(), attribute_name, term_name)
            .await
            .map_err(Into::into)
    }

    async fn upsert_term(
        &self,
        attribute_id: i64,
        name: &str,
        position: i64,
    ) -> Result<TermRow, DataError> {
        term::upsert_term(self.pool(), attribute_id, name, position)
            .await
            .map_err(Into::into)
    }

    // ==================== Product Operations ====================

    async fn list_products(
        &self,
        query: &ListingQuery,
    ) -> Result<(Vec<ProductRow>, u64), DataError> {
        product::list_products(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductRow>, DataError> {
        product::get_product(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_product_terms(&self, product_id: i64) -> Result<Vec<ProductTermRow>, DataError> {
        term::list_product_terms(self.pool(), product_id)
            .await
            .map_err(Into::into)
    }

    async fn create_product(&self, name: &str) -> Result<ProductRow, DataError> {
        product::create_product(self.pool(), name)
            .await
            .map_err(Into::into)
    }

    async fn assign_term(&self, product_id: i64, term_id: i64) -> Result<bool, DataError> {
        product::assign_term(self.pool(), product_id, term_id)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl WidgetRepository for Arc<SqliteService> {
    async fn list_widgets(&self) -> Result<Vec<WidgetRow>, DataError> {
        widget::list_widgets(self.pool()).await.map_err(Into::into)
    }

    async fn get_widget(&self, id: &str) -> Result<Option<WidgetRow>, DataError> {
        widget::get_widget(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn create_widget(
        &self,
        title: &str,
        attribute_name: &str,
    ) -> Result<WidgetRow, DataError> {
        widget::create_widget(self.pool(), title, attribute_name)
            .await
            .map_err(Into::into)
    }

    async fn update_widget(
        &self,
        id: &str,
        title: &str,
        attribute_name: &str,
    ) -> Result<Option<WidgetRow>, DataError> {
        widget::update_widget(self.pool(), id, title, attribute_name)
            .await
            .map_err(Into::into)
    }

    async fn delete_widget(&self, id: &str) -> Result<bool, DataError> {
        widget::delete_widget(self.pool(), id)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn setup_service() -> Arc<SqliteService> {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        Arc::new(SqliteService::from_pool(pool))
    }

    #[tokio::test]
    async fn test_catalog_through_trait_object() {
        let service = setup_service().await;
        let repo: Arc<dyn CatalogRepository> = Arc::new(service);

        let attr = repo.upsert_attribute("weight", "Weight").await.unwrap();
        repo.upsert_term(attr.id, "1/2", 0).await.unwrap();

        let terms = repo.list_terms("weight").await.unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].name, "1/2");
    }

    #[tokio::test]
    async fn test_widgets_through_trait_object() {
        let service = setup_service().await;
        let repo: Arc<dyn WidgetRepository> = Arc::new(service);

        let created = repo.create_widget("Weight", "weight").await.unwrap();
        assert_eq!(repo.list_widgets().await.unwrap().len(), 1);
        assert!(repo.delete_widget(&created.id).await.unwrap());
    }
}
