//! Playlist source repository

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::db::models::{ListCounts, M3uListRow, NewList};
use crate::models::ListStatus;

const LIST_COLUMNS: &str = r#"
    id, user_id, name, url, status, last_error, last_updated,
    channel_count, movie_count, series_count, radio_count, created_at, updated_at
"#;

/// Register a new source; it starts inactive with zero counts
pub async fn insert(pool: &PgPool, list: &NewList) -> Result<M3uListRow, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO m3u_lists (id, user_id, name, url, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        LIST_COLUMNS
    );

    sqlx::query_as::<_, M3uListRow>(&query)
        .bind(Uuid::new_v4())
        .bind(&list.user_id)
        .bind(&list.name)
        .bind(&list.url)
        .bind(ListStatus::Inactive.as_str())
        .fetch_one(pool)
        .await
}

/// Find source by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<M3uListRow>, sqlx::Error> {
    let query = format!("SELECT {} FROM m3u_lists WHERE id = $1", LIST_COLUMNS);

    sqlx::query_as::<_, M3uListRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All sources of a user, newest first
pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<M3uListRow>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM m3u_lists WHERE user_id = $1 ORDER BY created_at DESC",
        LIST_COLUMNS
    );

    sqlx::query_as::<_, M3uListRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Rename a source or change its URL; missing fields are left as they are
pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    url: Option<&str>,
) -> Result<Option<M3uListRow>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE m3u_lists SET
            name = COALESCE($2, name),
            url = COALESCE($3, url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        LIST_COLUMNS
    );

    sqlx::query_as::<_, M3uListRow>(&query)
        .bind(id)
        .bind(name)
        .bind(url)
        .fetch_optional(pool)
        .await
}

/// `CASE` expression mapping each stored status to its toggled value
fn toggled_status_sql() -> String {
    let arms: String = [ListStatus::Active, ListStatus::Inactive, ListStatus::Error]
        .iter()
        .map(|status| format!("WHEN '{}' THEN '{}' ", status, status.toggled()))
        .collect();

    // unknown values read as inactive, so they toggle like it
    format!(
        "CASE status {}ELSE '{}' END",
        arms,
        ListStatus::Inactive.toggled()
    )
}

/// Flip the lifecycle status in one statement
pub async fn toggle_status(pool: &PgPool, id: Uuid) -> Result<Option<M3uListRow>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE m3u_lists SET status = {}, updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        toggled_status_sql(),
        LIST_COLUMNS
    );

    sqlx::query_as::<_, M3uListRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete source and its content (CASCADE)
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM m3u_lists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Mark a refresh as successful and store the new counts
pub async fn record_success<'e, E>(executor: E, id: Uuid, counts: ListCounts) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE m3u_lists SET
            status = $2,
            last_error = NULL,
            last_updated = NOW(),
            channel_count = $3,
            movie_count = $4,
            series_count = $5,
            radio_count = $6,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(ListStatus::Active.as_str())
    .bind(counts.channel_count)
    .bind(counts.movie_count)
    .bind(counts.series_count)
    .bind(counts.radio_count)
    .execute(executor)
    .await?;

    Ok(())
}

/// Mark a refresh as failed; previous content and counts are kept
pub async fn record_failure(pool: &PgPool, id: Uuid, message: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE m3u_lists SET
            status = $2,
            last_error = $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(ListStatus::Error.as_str())
    .bind(message)
    .execute(pool)
    .await?;

    Ok(())
}
