//! Playlist ingestion
//!
//! Two entry points share the same pure pipeline (parse, classify,
//! categorize), which runs on the blocking thread pool when called from a
//! request or refresh:
//! - [`categorize_document`] for text the caller already has
//! - [`IngestService::refresh`] for a registered source: download, map to
//!   catalogue records, replace the stored content and update the source

use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

use crate::db::models::ListCounts;
use crate::db::repository::{lists, ContentWriter};
use crate::db::M3uListRow;
use crate::error::{IngestError, PlaylistError};
use crate::models::{CatalogueRecord, CategorizedBatch, IngestReport, ListStatus, PlaylistStats};
use crate::services::catalogue::{to_records, RecordDefaults};
use crate::services::categorizer::categorize;
use crate::services::classifier::ContentClassifier;
use crate::services::fetcher::PlaylistFetcher;
use crate::services::{m3u_parser, metrics};

/// Parse, classify and bucket a whole document
pub fn categorize_document(document: &str) -> Result<CategorizedBatch, PlaylistError> {
    let entries = m3u_parser::parse(document)?;
    Ok(categorize(ContentClassifier::classify_all(entries)))
}

/// [`categorize_document`] on the blocking pool
pub async fn categorize_in_background(document: String) -> Result<CategorizedBatch, IngestError> {
    let batch = tokio::task::spawn_blocking(move || categorize_document(&document)).await??;
    Ok(batch)
}

/// Records and counts ready to be written for one source
#[derive(Debug, Clone)]
pub struct PreparedIngest {
    pub records: Vec<CatalogueRecord>,
    pub stats: PlaylistStats,
}

/// Run the pipeline for a source; zero entries is a failure here
pub fn prepare(
    document: &str,
    list_key: &str,
    defaults: &RecordDefaults,
) -> Result<PreparedIngest, IngestError> {
    let entries = m3u_parser::parse(document)?;
    if entries.is_empty() {
        return Err(IngestError::Empty);
    }

    let classified = ContentClassifier::classify_all(entries);
    let records = to_records(&classified, list_key, defaults);
    let stats = categorize(classified).stats();

    Ok(PreparedIngest { records, stats })
}

/// [`prepare`] on the blocking pool
pub async fn prepare_in_background(
    document: String,
    list_key: String,
    defaults: RecordDefaults,
) -> Result<PreparedIngest, IngestError> {
    tokio::task::spawn_blocking(move || prepare(&document, &list_key, &defaults)).await?
}

/// Ids of sources with a refresh in flight
#[derive(Debug, Clone, Default)]
pub struct RefreshLocks {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl RefreshLocks {
    /// None when a refresh of the same source is already running
    pub fn try_acquire(&self, id: Uuid) -> Option<RefreshGuard> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(id) {
            return None;
        }

        Some(RefreshGuard {
            in_flight: Arc::clone(&self.in_flight),
            id,
        })
    }

    pub fn is_refreshing(&self, id: Uuid) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&id)
    }
}

/// Releases the source on drop
pub struct RefreshGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    id: Uuid,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}

/// Batch ingestion of registered sources
#[derive(Clone)]
pub struct IngestService {
    pool: PgPool,
    fetcher: PlaylistFetcher,
    defaults: RecordDefaults,
    locks: RefreshLocks,
}

impl IngestService {
    pub fn new(pool: PgPool, fetcher: PlaylistFetcher, defaults: RecordDefaults) -> Self {
        Self {
            pool,
            fetcher,
            defaults,
            locks: RefreshLocks::default(),
        }
    }

    pub fn locks(&self) -> &RefreshLocks {
        &self.locks
    }

    /// Download a source and replace its catalogue content
    ///
    /// On failure the previous content stays in place and the source is
    /// marked as errored, except for failures unrelated to the playlist
    /// itself (unknown source, concurrent refresh, database).
    pub async fn refresh(&self, list_id: Uuid) -> Result<IngestReport, IngestError> {
        let _guard = self.locks.try_acquire(list_id).ok_or(IngestError::Busy)?;
        let start = Instant::now();

        let list = lists::find_by_id(&self.pool, list_id)
            .await?
            .ok_or(IngestError::NotFound)?;

        tracing::info!(list_id = %list_id, url = %list.url, "Refreshing playlist");

        match self.ingest(&list).await {
            Ok(stats) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                metrics::record_ingested(&stats);
                tracing::info!(
                    list_id = %list_id,
                    total = stats.total_items,
                    live = stats.channel_count,
                    movies = stats.movie_count,
                    series = stats.series_count,
                    radio = stats.radio_count,
                    elapsed_ms = elapsed_ms,
                    "Playlist refreshed"
                );

                Ok(IngestReport {
                    list_id,
                    status: ListStatus::Active,
                    stats,
                    elapsed_ms,
                })
            }
            Err(err) => {
                metrics::record_failure(err.reason());
                tracing::warn!(list_id = %list_id, reason = err.reason(), "Refresh failed: {}", err);

                if err.marks_source() {
                    if let Err(db_err) = lists::record_failure(&self.pool, list_id, &err.to_string()).await {
                        tracing::error!(list_id = %list_id, "Failed to record refresh error: {}", db_err);
                    }
                }

                Err(err)
            }
        }
    }

    async fn ingest(&self, list: &M3uListRow) -> Result<PlaylistStats, IngestError> {
        let document = self.fetcher.fetch(&list.url).await?;
        let prepared =
            prepare_in_background(document, list.id.to_string(), self.defaults.clone()).await?;

        let mut writer = ContentWriter::begin(&self.pool, list.id).await?;
        for record in &prepared.records {
            writer.write_record(record).await?;
        }
        writer.finish(ListCounts::from(&prepared.stats)).await?;

        Ok(prepared.stats)
    }
}
