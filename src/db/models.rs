//! Database row types for PostgreSQL
//!
//! These map directly to rows of `m3u_lists` and `content` and convert
//! into the API types in models/catalogue.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{CatalogueRecord, ListStatus, M3uList, MediaKind, PlaylistStats, Rating};

// ============================================================================
// Database Row Types
// ============================================================================

/// Registered source row
#[derive(Debug, Clone, FromRow)]
pub struct M3uListRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub status: String,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub channel_count: i32,
    pub movie_count: i32,
    pub series_count: i32,
    pub radio_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl M3uListRow {
    pub fn status(&self) -> ListStatus {
        ListStatus::parse(&self.status)
    }
}

impl From<M3uListRow> for M3uList {
    fn from(row: M3uListRow) -> Self {
        M3uList {
            status: row.status(),
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            url: row.url,
            last_error: row.last_error,
            last_updated: row.last_updated,
            channel_count: row.channel_count.max(0) as usize,
            movie_count: row.movie_count.max(0) as usize,
            series_count: row.series_count.max(0) as usize,
            radio_count: row.radio_count.max(0) as usize,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Catalogue content row
///
/// The `type` column is selected as `media_kind`.
#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub m3u_list_id: Uuid,
    pub item_hash: String,
    pub title: String,
    pub thumbnail: String,
    pub genre: String,
    pub stream_url: String,
    pub media_kind: String,
    pub description: String,
    pub year: Option<i16>,
    pub rating: String,
    pub duration: String,
    pub is_radio: bool,
    pub sort_order: i32,
}

impl From<ContentRow> for CatalogueRecord {
    fn from(row: ContentRow) -> Self {
        CatalogueRecord {
            id: row.item_hash,
            title: row.title,
            thumbnail: row.thumbnail,
            genre: row.genre,
            stream_url: row.stream_url,
            media_kind: MediaKind::parse(&row.media_kind).unwrap_or_default(),
            description: row.description,
            year: row.year.and_then(|y| u16::try_from(y).ok()),
            rating: Rating::parse(&row.rating),
            duration: row.duration,
            is_radio: row.is_radio,
        }
    }
}

// ============================================================================
// Insert/Write Types
// ============================================================================

/// New source to insert
#[derive(Debug, Clone)]
pub struct NewList {
    pub user_id: String,
    pub name: String,
    pub url: String,
}

/// Counts written back after a successful refresh
#[derive(Debug, Clone, Copy)]
pub struct ListCounts {
    pub channel_count: i32,
    pub movie_count: i32,
    pub series_count: i32,
    pub radio_count: i32,
}

impl From<&PlaylistStats> for ListCounts {
    fn from(stats: &PlaylistStats) -> Self {
        let clamp = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        ListCounts {
            channel_count: clamp(stats.channel_count),
            movie_count: clamp(stats.movie_count),
            series_count: clamp(stats.series_count),
            radio_count: clamp(stats.radio_count),
        }
    }
}

/// New content row (for COPY protocol)
#[derive(Debug, Clone)]
pub struct NewContent {
    pub m3u_list_id: Uuid,
    pub item_hash: String,
    pub title: String,
    pub thumbnail: String,
    pub genre: String,
    pub stream_url: String,
    pub media_kind: &'static str,
    pub description: String,
    pub year: Option<i16>,
    pub rating: &'static str,
    pub duration: String,
    pub is_radio: bool,
    pub sort_order: i32,
}

impl NewContent {
    pub fn from_record(record: &CatalogueRecord, m3u_list_id: Uuid, sort_order: i32) -> Self {
        NewContent {
            m3u_list_id,
            item_hash: record.id.clone(),
            title: record.title.clone(),
            thumbnail: record.thumbnail.clone(),
            genre: record.genre.clone(),
            stream_url: record.stream_url.clone(),
            media_kind: record.media_kind.as_str(),
            description: record.description.clone(),
            year: record.year.and_then(|y| i16::try_from(y).ok()),
            rating: record.rating.as_str(),
            duration: record.duration.clone(),
            is_radio: record.is_radio,
            sort_order,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape a value for COPY text format
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', "")
}

/// Format a row for COPY protocol (tab-separated values)
pub fn format_copy_line(row: &NewContent) -> String {
    // id, m3u_list_id, item_hash, title, thumbnail, genre, stream_url, type,
    // description, year, rating, duration, is_radio, sort_order
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
        Uuid::new_v4(),
        row.m3u_list_id,
        escape(&row.item_hash),
        escape(&row.title),
        escape(&row.thumbnail),
        escape(&row.genre),
        escape(&row.stream_url),
        row.media_kind,
        escape(&row.description),
        row.year.map(|y| y.to_string()).unwrap_or_else(|| "\\N".to_string()),
        row.rating,
        escape(&row.duration),
        if row.is_radio { "t" } else { "f" },
        row.sort_order,
    )
}
