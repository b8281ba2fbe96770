//! Widget instance repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::WidgetRow;

type WidgetTuple = (String, String, String, i64, i64);

fn from_tuple((id, title, attribute_name, created_at, updated_at): WidgetTuple) -> WidgetRow {
    WidgetRow {
        id,
        title,
        attribute_name,
        created_at,
        updated_at,
    }
}

/// Create a new widget instance with a generated CUID2 ID
pub async fn create_widget(
    pool: &SqlitePool,
    title: &str,
    attribute_name: &str,
) -> Result<WidgetRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO widgets (id, title, attribute_name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(title)
    .bind(attribute_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(WidgetRow {
        id,
        title: title.to_string(),
        attribute_name: attribute_name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub async fn get_widget(pool: &SqlitePool, id: &str) -> Result<Option<WidgetRow>, SqliteError> {
    let row = sqlx::query_as::<_, WidgetTuple>(
        "SELECT id, title, attribute_name, created_at, updated_at FROM widgets WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(from_tuple))
}

/// List widget instances in creation order (display order in the sidebar)
pub async fn list_widgets(pool: &SqlitePool) -> Result<Vec<WidgetRow>, SqliteError> {
    let rows = sqlx::query_as::<_, WidgetTuple>(
        "SELECT id, title, attribute_name, created_at, updated_at FROM widgets ORDER BY created_at, rowid",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_tuple).collect())
}

/// Update a widget instance
/// Returns None if the widget does not exist
pub async fn update_widget(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    attribute_name: &str,
) -> Result<Option<WidgetRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let row = sqlx::query_as::<_, WidgetTuple>(
        r#"
        UPDATE widgets
        SET title = ?, attribute_name = ?, updated_at = ?
        WHERE id = ?
        RETURNING id, title, attribute_name, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(attribute_name)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(from_tuple))
}

/// Delete a widget instance
/// Returns true if deleted, false if it didn't exist
pub async fn delete_widget(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM widgets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
