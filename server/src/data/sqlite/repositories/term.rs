//! Term repository for SQLite operations
//!
//! Terms are returned in catalog order (`position`, then insertion order).

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ProductTermRow, TermRow};

/// Insert a term for an attribute, or move an existing one to `position`
pub async fn upsert_term(
    pool: &SqlitePool,
    attribute_id: i64,
    name: &str,
    position: i64,
) -> Result<TermRow, SqliteError> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO terms (attribute_id, name, position)
        VALUES (?, ?, ?)
        ON CONFLICT(attribute_id, name) DO UPDATE SET position = excluded.position
        RETURNING id
        "#,
    )
    .bind(attribute_id)
    .bind(name)
    .bind(position)
    .fetch_one(pool)
    .await?;

    Ok(TermRow {
        id,
        attribute_id,
        name: name.to_string(),
    })
}

/// List the terms of an attribute by attribute name
pub async fn list_terms(
    pool: &SqlitePool,
    attribute_name: &str,
) -> Result<Vec<TermRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, i64, String)>(
        r#"
        SELECT t.id, t.attribute_id, t.name
        FROM terms t
        JOIN attributes a ON a.id = t.attribute_id
        WHERE a.name = ?
        ORDER BY t.position, t.id
        "#,
    )
    .bind(attribute_name)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, attribute_id, name)| TermRow {
            id,
            attribute_id,
            name,
        })
        .collect())
}

/// Find one term by attribute name and term label
pub async fn get_term_by_name(
    pool: &SqlitePool,
    attribute_name: &str,
    term_name: &str,
) -> Result<Option<TermRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, i64, String)>(
        r#"
        SELECT t.id, t.attribute_id, t.name
        FROM terms t
        JOIN attributes a ON a.id = t.attribute_id
        WHERE a.name = ? AND t.name = ?
        "#,
    )
    .bind(attribute_name)
    .bind(term_name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, attribute_id, name)| TermRow {
        id,
        attribute_id,
        name,
    }))
}

/// Terms assigned to a product, grouped by attribute name
pub async fn list_product_terms(
    pool: &SqlitePool,
    product_id: i64,
) -> Result<Vec<ProductTermRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, i64, String)>(
        r#"
        SELECT a.name, a.label, t.id, t.name
        FROM product_terms pt
        JOIN terms t ON t.id = pt.term_id
        JOIN attributes a ON a.id = t.attribute_id
        WHERE pt.product_id = ?
        ORDER BY a.name, t.position, t.id
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(attribute_name, attribute_label, term_id, term_name)| ProductTermRow {
                attribute_name,
                attribute_label,
                term_id,
                term_name,
            },
        )
        .collect())
}
