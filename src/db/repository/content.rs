//! Catalogue content repository with batched COPY writes

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{format_copy_line, ContentRow, ListCounts, NewContent};
use crate::db::repository::lists;
use crate::models::{CatalogueRecord, MediaKind};

/// Columns of `content c`, for queries that join it with `m3u_lists l`
pub(crate) const CONTENT_COLUMNS: &str = r#"
    c.id, c.m3u_list_id, c.item_hash, c.title, c.thumbnail, c.genre, c.stream_url,
    c.type AS media_kind, c.description, c.year, c.rating, c.duration, c.is_radio, c.sort_order
"#;

/// Scope ($1, $2) and filters ($3 to $5) shared by `get_page` and `count`
const FILTERED_CONTENT: &str = r#"
    FROM content c
    JOIN m3u_lists l ON l.id = c.m3u_list_id
    WHERE ($1::uuid IS NULL OR c.m3u_list_id = $1)
      AND ($2::text IS NULL OR l.user_id = $2)
      AND ($3::text IS NULL OR c.type = $3)
      AND (NOT $4 OR c.is_radio)
      AND ($5::text IS NULL OR c.genre ILIKE $5 ESCAPE '\')
"#;

/// `%text%` for ILIKE, with the pattern metacharacters matched literally
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Replaces the content of one source inside a single transaction
///
/// Old rows are deleted on `begin`; new rows are sent in COPY batches and
/// the source counts are updated on `finish`. Dropping the writer before
/// `finish` rolls everything back, so readers never see a half-written
/// catalogue.
pub struct ContentWriter {
    tx: Transaction<'static, Postgres>,
    m3u_list_id: Uuid,
    batch: Vec<NewContent>,
    batch_size: usize,
    rows_written: usize,
}

impl ContentWriter {
    pub async fn begin(pool: &PgPool, m3u_list_id: Uuid) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM content WHERE m3u_list_id = $1")
            .bind(m3u_list_id)
            .execute(&mut *tx)
            .await?;

        Ok(ContentWriter {
            tx,
            m3u_list_id,
            batch: Vec::with_capacity(500),
            batch_size: 500,
            rows_written: 0,
        })
    }

    /// Write a single record (batched)
    pub async fn write_record(&mut self, record: &CatalogueRecord) -> Result<(), sqlx::Error> {
        let sort_order = i32::try_from(self.rows_written).unwrap_or(i32::MAX);
        self.batch
            .push(NewContent::from_record(record, self.m3u_list_id, sort_order));
        self.rows_written += 1;

        if self.batch.len() >= self.batch_size {
            self.flush_batch().await?;
        }

        Ok(())
    }

    async fn flush_batch(&mut self) -> Result<(), sqlx::Error> {
        if self.batch.is_empty() {
            return Ok(());
        }

        let copy_query = r#"
            COPY content (id, m3u_list_id, item_hash, title, thumbnail, genre, stream_url, type,
                          description, year, rating, duration, is_radio, sort_order)
            FROM STDIN WITH (FORMAT text, NULL '\N')
        "#;

        let mut copy = self.tx.copy_in_raw(copy_query).await?;

        for row in &self.batch {
            let line = format_copy_line(row);
            copy.send(line.as_bytes()).await?;
        }

        copy.finish().await?;
        self.batch.clear();

        Ok(())
    }

    /// Flush, store the new counts and commit
    pub async fn finish(mut self, counts: ListCounts) -> Result<usize, sqlx::Error> {
        self.flush_batch().await?;

        lists::record_success(&mut *self.tx, self.m3u_list_id, counts).await?;

        self.tx.commit().await?;

        Ok(self.rows_written)
    }
}

/// Which catalogue a query reads
#[derive(Debug, Clone, Copy)]
pub enum ContentScope<'a> {
    /// One source
    List(Uuid),
    /// Every source of a user, newest source first
    User(&'a str),
}

impl ContentScope<'_> {
    fn list_id(&self) -> Option<Uuid> {
        match self {
            ContentScope::List(id) => Some(*id),
            ContentScope::User(_) => None,
        }
    }

    fn user_id(&self) -> Option<&str> {
        match self {
            ContentScope::List(_) => None,
            ContentScope::User(user_id) => Some(*user_id),
        }
    }
}

/// Filters for browsing a catalogue
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub media_kind: Option<MediaKind>,
    /// Restrict to audio-only entries of any kind
    pub radio_only: bool,
    /// Case-insensitive substring of the category
    pub genre: Option<String>,
}

impl ContentFilter {
    fn genre_pattern(&self) -> Option<String> {
        self.genre.as_deref().map(like_pattern)
    }
}

/// Get content with pagination and optional filters, in source order
pub async fn get_page(
    pool: &PgPool,
    scope: ContentScope<'_>,
    filter: &ContentFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContentRow>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        {}
        ORDER BY l.created_at DESC, c.m3u_list_id, c.sort_order
        LIMIT $6 OFFSET $7
        "#,
        CONTENT_COLUMNS, FILTERED_CONTENT
    );

    sqlx::query_as::<_, ContentRow>(&query)
        .bind(scope.list_id())
        .bind(scope.user_id())
        .bind(filter.media_kind.map(|k| k.as_str()))
        .bind(filter.radio_only)
        .bind(filter.genre_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count content matching the same scope and filters as `get_page`
pub async fn count(
    pool: &PgPool,
    scope: ContentScope<'_>,
    filter: &ContentFilter,
) -> Result<i64, sqlx::Error> {
    let query = format!("SELECT COUNT(*) {}", FILTERED_CONTENT);

    let count: (i64,) = sqlx::query_as(&query)
        .bind(scope.list_id())
        .bind(scope.user_id())
        .bind(filter.media_kind.map(|k| k.as_str()))
        .bind(filter.radio_only)
        .bind(filter.genre_pattern())
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

/// Text search over title, description and category
pub async fn search(
    pool: &PgPool,
    m3u_list_id: Uuid,
    text: &str,
    limit: i64,
) -> Result<Vec<ContentRow>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        FROM content c
        WHERE c.m3u_list_id = $1
          AND (c.title ILIKE $2 ESCAPE '\'
               OR c.description ILIKE $2 ESCAPE '\'
               OR c.genre ILIKE $2 ESCAPE '\')
        ORDER BY c.sort_order
        LIMIT $3
        "#,
        CONTENT_COLUMNS
    );

    sqlx::query_as::<_, ContentRow>(&query)
        .bind(m3u_list_id)
        .bind(like_pattern(text))
        .bind(limit)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_text() {
        assert_eq!(like_pattern("Ação"), "%Ação%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\tv"), r"%c:\\tv%");
    }

    #[test]
    fn test_queries_declare_escape_character() {
        assert!(FILTERED_CONTENT.contains(r"ILIKE $5 ESCAPE '\'"));
        assert!(!FILTERED_CONTENT.contains("'%' ||"));
    }

    #[test]
    fn test_scope_binds() {
        let id = Uuid::new_v4();
        assert_eq!(ContentScope::List(id).list_id(), Some(id));
        assert_eq!(ContentScope::List(id).user_id(), None);
        assert_eq!(ContentScope::User("u1").list_id(), None);
        assert_eq!(ContentScope::User("u1").user_id(), Some("u1"));
    }
}
