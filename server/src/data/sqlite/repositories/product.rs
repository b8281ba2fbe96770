//! Product repository for SQLite operations
//!
//! Listing reads the filter expression attached to the [`ListingQuery`] and
//! renders it through the filter builder.

use sqlx::SqlitePool;

use crate::data::filters::{FilterSql, SqlParams};
use crate::data::listing::ListingQuery;
use crate::data::sqlite::SqliteError;
use crate::data::types::ProductRow;

pub async fn create_product(pool: &SqlitePool, name: &str) -> Result<ProductRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO products (name, created_at) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(now)
            .fetch_one(pool)
            .await?;

    Ok(ProductRow {
        id,
        name: name.to_string(),
        created_at: now,
    })
}

/// Assign a term to a product (idempotent)
/// Returns true if assigned, false if already present
pub async fn assign_term(
    pool: &SqlitePool,
    product_id: i64,
    term_id: i64,
) -> Result<bool, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO product_terms (product_id, term_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
    )
    .bind(product_id)
    .bind(term_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_product(pool: &SqlitePool, id: i64) -> Result<Option<ProductRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, i64)>(
        "SELECT id, name, created_at FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, created_at)| ProductRow {
        id,
        name,
        created_at,
    }))
}

/// Execute a listing query: one page of products plus the total match count
pub async fn list_products(
    pool: &SqlitePool,
    query: &ListingQuery,
) -> Result<(Vec<ProductRow>, u64), SqliteError> {
    let mut params = SqlParams::default();
    let where_clause = match query.filter() {
        Some(expr) => expr.to_sql_aliased(&mut params, "p"),
        None => "1=1".to_string(),
    };

    let sql = format!(
        "SELECT p.id, p.name, p.created_at FROM products p WHERE {} ORDER BY p.id LIMIT ? OFFSET ?",
        where_clause
    );
    let mut rows_query = sqlx::query_as::<_, (i64, String, i64)>(&sql);
    for value in &params.values {
        rows_query = rows_query.bind(*value);
    }
    let rows = rows_query
        .bind(query.per_page() as i64)
        .bind(query.offset() as i64)
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM products p WHERE {}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for value in &params.values {
        count_query = count_query.bind(*value);
    }
    let total = count_query.fetch_one(pool).await?;

    tracing::trace!(
        filter = %where_clause,
        page = query.page(),
        total,
        "Listed products"
    );

    let products = rows
        .into_iter()
        .map(|(id, name, created_at)| ProductRow {
            id,
            name,
            created_at,
        })
        .collect();

    Ok((products, total as u64))
}
