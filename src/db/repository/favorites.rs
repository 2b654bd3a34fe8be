//! Per-user favorites over catalogue items

use sqlx::PgPool;

use crate::db::models::ContentRow;
use crate::db::repository::content::CONTENT_COLUMNS;

/// Mark an item as favorite
///
/// The item must belong to one of the user's sources. Returns false when
/// no such item exists; adding an existing favorite is a no-op.
pub async fn add(pool: &PgPool, user_id: &str, content_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (user_id, content_id, m3u_list_id)
        SELECT l.user_id, c.item_hash, c.m3u_list_id
        FROM content c
        JOIN m3u_lists l ON l.id = c.m3u_list_id
        WHERE c.item_hash = $2 AND l.user_id = $1
        LIMIT 1
        ON CONFLICT (user_id, content_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(content_id)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(true);
    }
    exists(pool, user_id, content_id).await
}

/// Returns false when the item was not a favorite
pub async fn remove(pool: &PgPool, user_id: &str, content_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND content_id = $2")
        .bind(user_id)
        .bind(content_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(pool: &PgPool, user_id: &str, content_id: &str) -> Result<bool, sqlx::Error> {
    let found: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND content_id = $2)",
    )
    .bind(user_id)
    .bind(content_id)
    .fetch_one(pool)
    .await?;

    Ok(found.0)
}

/// Favorite items still present in the catalogue, most recently added first
pub async fn list_content(pool: &PgPool, user_id: &str) -> Result<Vec<ContentRow>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        FROM favorites f
        JOIN content c ON c.item_hash = f.content_id AND c.m3u_list_id = f.m3u_list_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        "#,
        CONTENT_COLUMNS
    );

    sqlx::query_as::<_, ContentRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
