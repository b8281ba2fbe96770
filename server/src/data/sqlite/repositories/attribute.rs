//! Attribute repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::AttributeRow;

/// Insert an attribute, or update the label of an existing one with the same name
pub async fn upsert_attribute(
    pool: &SqlitePool,
    name: &str,
    label: &str,
) -> Result<AttributeRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO attributes (name, label, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET label = excluded.label
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(label)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(AttributeRow {
        id,
        name: name.to_string(),
        label: label.to_string(),
    })
}

/// Get an attribute by its bare name
pub async fn get_attribute(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<AttributeRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, label FROM attributes WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, label)| AttributeRow { id, name, label }))
}

/// List all attributes ordered by name
pub async fn list_attributes(pool: &SqlitePool) -> Result<Vec<AttributeRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, label FROM attributes ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, label)| AttributeRow { id, name, label })
        .collect())
}
