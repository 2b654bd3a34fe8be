use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::playlist::{MediaKind, PlaylistStats, Rating};

/// Lifecycle status of a registered playlist source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Active,
    #[default]
    Inactive,
    Error,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Active => "active",
            ListStatus::Inactive => "inactive",
            ListStatus::Error => "error",
        }
    }

    /// Stored values other than the three known ones are treated as inactive
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => ListStatus::Active,
            "error" => ListStatus::Error,
            _ => ListStatus::Inactive,
        }
    }

    /// Status after a user toggle; errored lists become active again
    pub fn toggled(self) -> Self {
        match self {
            ListStatus::Active => ListStatus::Inactive,
            ListStatus::Inactive | ListStatus::Error => ListStatus::Active,
        }
    }
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered M3U source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct M3uList {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub status: ListStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub channel_count: usize,
    pub movie_count: usize,
    pub series_count: usize,
    pub radio_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One catalogue row as persisted for a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueRecord {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub genre: String,
    pub stream_url: String,
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub rating: Rating,
    pub duration: String,
    pub is_radio: bool,
}

/// Request to register a new source
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub user_id: String,
    pub name: String,
    pub url: String,
}

/// Partial update of a source
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `?userId=` for per-user listings (sources, favorites)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: String,
}

/// Sources response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsResponse {
    pub lists: Vec<M3uList>,
    pub total: usize,
}

/// Result of a refresh run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub list_id: Uuid,
    pub status: ListStatus,
    pub stats: PlaylistStats,
    pub elapsed_ms: u64,
}

/// Query parameters for catalogue browsing
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(default, rename = "type")]
    pub media_kind: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

/// Query parameters for browsing every source of a user at once
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContentQuery {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, rename = "type")]
    pub media_kind: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Query parameters for catalogue search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Search response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub items: Vec<CatalogueRecord>,
    pub total: usize,
}

/// Paginated catalogue response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub items: Vec<CatalogueRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Add or toggle a favorite
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: String,
    pub content_id: String,
}

/// Favorite flag of one item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub content_id: String,
    pub favorite: bool,
}

/// Favorite items of a user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub items: Vec<CatalogueRecord>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle() {
        assert_eq!(ListStatus::Active.toggled(), ListStatus::Inactive);
        assert_eq!(ListStatus::Inactive.toggled(), ListStatus::Active);
        assert_eq!(ListStatus::Error.toggled(), ListStatus::Active);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ListStatus::parse("active"), ListStatus::Active);
        assert_eq!(ListStatus::parse("error"), ListStatus::Error);
        assert_eq!(ListStatus::parse("paused"), ListStatus::Inactive);
    }

    #[test]
    fn test_content_query_defaults() {
        let query: ContentQuery = serde_json::from_str(r#"{"type":"movie"}"#).unwrap();
        assert_eq!(query.media_kind.as_deref(), Some("movie"));
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_user_content_query() {
        let query: UserContentQuery =
            serde_json::from_str(r#"{"userId":"u1","type":"radio","offset":100}"#).unwrap();
        assert_eq!(query.user_id, "u1");
        assert_eq!(query.media_kind.as_deref(), Some("radio"));
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 100);
    }

    #[test]
    fn test_favorite_status_json() {
        let status = FavoriteStatus {
            content_id: "abc".to_string(),
            favorite: true,
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({ "contentId": "abc", "favorite": true })
        );
    }
}
