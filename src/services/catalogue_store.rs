//! PostgreSQL-backed store for registered sources and their catalogue

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::NewList;
use crate::db::repository::{content, favorites, lists, ContentFilter, ContentScope};
use crate::models::{CatalogueRecord, M3uList};

/// Source and catalogue access for the HTTP layer
#[derive(Clone)]
pub struct CatalogueStore {
    pool: PgPool,
}

impl CatalogueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a source; it stays inactive until its first refresh
    pub async fn create_list(&self, user_id: &str, name: &str, url: &str) -> Result<M3uList> {
        let new_list = NewList {
            user_id: user_id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        };

        let row = lists::insert(&self.pool, &new_list)
            .await
            .context("failed to insert m3u list")?;

        tracing::info!("Registered playlist {} for user {}", row.id, row.user_id);
        Ok(row.into())
    }

    /// Sources of a user, newest first
    pub async fn lists_for_user(&self, user_id: &str) -> Result<Vec<M3uList>> {
        let rows = lists::list_by_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_list(&self, id: Uuid) -> Result<Option<M3uList>> {
        let row = lists::find_by_id(&self.pool, id).await?;
        Ok(row.map(Into::into))
    }

    pub async fn update_list(
        &self,
        id: Uuid,
        name: Option<&str>,
        url: Option<&str>,
    ) -> Result<Option<M3uList>> {
        let row = lists::update_details(&self.pool, id, name, url)
            .await
            .context("failed to update m3u list")?;
        Ok(row.map(Into::into))
    }

    /// Flip between active and inactive
    pub async fn toggle_list(&self, id: Uuid) -> Result<Option<M3uList>> {
        let row = lists::toggle_status(&self.pool, id)
            .await
            .context("failed to toggle m3u list")?;
        Ok(row.map(Into::into))
    }

    /// Delete a source and its content; false when it did not exist
    pub async fn delete_list(&self, id: Uuid) -> Result<bool> {
        let deleted = lists::delete(&self.pool, id).await?;
        if deleted > 0 {
            tracing::info!("Deleted playlist {}", id);
        }
        Ok(deleted > 0)
    }

    /// One page of content plus the total matching the filter
    pub async fn content_page(
        &self,
        scope: ContentScope<'_>,
        filter: &ContentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CatalogueRecord>, usize)> {
        let rows = content::get_page(&self.pool, scope, filter, limit, offset).await?;
        let total = content::count(&self.pool, scope, filter).await?;

        Ok((
            rows.into_iter().map(Into::into).collect(),
            usize::try_from(total).unwrap_or(0),
        ))
    }

    pub async fn search(&self, list_id: Uuid, text: &str, limit: i64) -> Result<Vec<CatalogueRecord>> {
        let rows = content::search(&self.pool, list_id, text, limit).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// False when the item is not in any of the user's sources
    pub async fn add_favorite(&self, user_id: &str, content_id: &str) -> Result<bool> {
        favorites::add(&self.pool, user_id, content_id)
            .await
            .context("failed to add favorite")
    }

    /// False when the item was not a favorite
    pub async fn remove_favorite(&self, user_id: &str, content_id: &str) -> Result<bool> {
        favorites::remove(&self.pool, user_id, content_id)
            .await
            .context("failed to remove favorite")
    }

    pub async fn is_favorite(&self, user_id: &str, content_id: &str) -> Result<bool> {
        Ok(favorites::exists(&self.pool, user_id, content_id).await?)
    }

    /// Flip the favorite flag; None when the item is unknown to the user
    pub async fn toggle_favorite(&self, user_id: &str, content_id: &str) -> Result<Option<bool>> {
        if self.remove_favorite(user_id, content_id).await? {
            return Ok(Some(false));
        }

        let added = self.add_favorite(user_id, content_id).await?;
        Ok(added.then_some(true))
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Vec<CatalogueRecord>> {
        let rows = favorites::list_content(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
