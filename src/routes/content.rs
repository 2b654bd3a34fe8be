use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repository::{ContentFilter, ContentScope};
use crate::models::{
    CatalogueRecord, ContentQuery, ContentResponse, MediaKind, SearchQuery, SearchResponse,
    UserContentQuery,
};
use crate::routes::{api_error, internal_error, required_text, ApiError};
use crate::AppState;

/// `type=radio` selects audio-only entries; other values name a kind
fn content_filter(media_kind: Option<&str>, genre: Option<&str>) -> Result<ContentFilter, ApiError> {
    let mut filter = ContentFilter {
        genre: genre
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string),
        ..Default::default()
    };

    match media_kind.map(str::trim) {
        None | Some("") => {}
        Some(kind) if kind.eq_ignore_ascii_case("radio") => filter.radio_only = true,
        Some(kind) => {
            filter.media_kind = Some(MediaKind::parse(kind).ok_or_else(|| {
                api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Tipo inválido: {}", kind),
                )
            })?);
        }
    }

    Ok(filter)
}

fn page_limit(requested: usize, max: usize) -> usize {
    requested.clamp(1, max.max(1))
}

/// SQL bound for a page parameter
fn sql_bound(value: usize, field: &str) -> Result<i64, ApiError> {
    i64::try_from(value)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("{} inválido", field)))
}

/// Validated page window: clamped limit and offset, plus their SQL values
struct Page {
    limit: usize,
    offset: usize,
    sql_limit: i64,
    sql_offset: i64,
}

impl Page {
    fn new(limit: usize, offset: usize, max: usize) -> Result<Self, ApiError> {
        let limit = page_limit(limit, max);
        Ok(Page {
            sql_limit: sql_bound(limit, "limit")?,
            sql_offset: sql_bound(offset, "offset")?,
            limit,
            offset,
        })
    }

    fn response(&self, items: Vec<CatalogueRecord>, total: usize) -> ContentResponse {
        ContentResponse {
            has_more: self.offset.saturating_add(items.len()) < total,
            items,
            total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

async fn ensure_list(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    match state.store.get_list(id).await.map_err(internal_error)? {
        Some(_) => Ok(()),
        None => Err(api_error(StatusCode::NOT_FOUND, "Lista não encontrada")),
    }
}

/// GET /api/lists/:id/content?type=&genre=&limit=&offset=
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ContentResponse>, ApiError> {
    let filter = content_filter(query.media_kind.as_deref(), query.genre.as_deref())?;
    let page = Page::new(query.limit, query.offset, state.config.max_items_page)?;

    ensure_list(&state, id).await?;

    let (items, total) = state
        .store
        .content_page(ContentScope::List(id), &filter, page.sql_limit, page.sql_offset)
        .await
        .map_err(internal_error)?;

    Ok(Json(page.response(items, total)))
}

/// GET /api/content?userId=&type=&genre=&limit=&offset= - Every source of a user
pub async fn get_user_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserContentQuery>,
) -> Result<Json<ContentResponse>, ApiError> {
    let user_id = required_text(&query.user_id, "userId")?;
    let filter = content_filter(query.media_kind.as_deref(), query.genre.as_deref())?;
    let page = Page::new(query.limit, query.offset, state.config.max_items_page)?;

    let (items, total) = state
        .store
        .content_page(ContentScope::User(&user_id), &filter, page.sql_limit, page.sql_offset)
        .await
        .map_err(internal_error)?;

    Ok(Json(page.response(items, total)))
}

/// GET /api/lists/:id/search?q= - Title, description and category search
pub async fn search_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let text = query.q.trim().to_string();
    if text.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Parâmetro q é obrigatório"));
    }
    let page = Page::new(query.limit, 0, state.config.max_items_page)?;

    ensure_list(&state, id).await?;

    let items = state
        .store
        .search(id, &text, page.sql_limit)
        .await
        .map_err(internal_error)?;

    Ok(Json(SearchResponse {
        query: text,
        total: items.len(),
        items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::body::Body;
    use axum::http::Request;

    async fn get(uri: &str) -> axum::http::Response<Body> {
        test_support::send(
            test_support::state(),
            Request::get(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    #[test]
    fn test_filter_kinds() {
        let filter = content_filter(Some("movies"), None).unwrap();
        assert_eq!(filter.media_kind, Some(MediaKind::Movie));
        assert!(!filter.radio_only);

        let filter = content_filter(Some("radio"), Some("  Rádios ")).unwrap();
        assert_eq!(filter.media_kind, None);
        assert!(filter.radio_only);
        assert_eq!(filter.genre.as_deref(), Some("Rádios"));

        let filter = content_filter(None, Some("")).unwrap();
        assert_eq!(filter.media_kind, None);
        assert_eq!(filter.genre, None);

        let err = content_filter(Some("podcast"), None).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_page_limit() {
        assert_eq!(page_limit(50, 500), 50);
        assert_eq!(page_limit(0, 500), 1);
        assert_eq!(page_limit(10_000, 500), 500);
    }

    #[test]
    fn test_page_bounds() {
        let page = Page::new(10_000, 20, 500).unwrap();
        assert_eq!((page.limit, page.sql_limit), (500, 500));
        assert_eq!((page.offset, page.sql_offset), (20, 20));

        let err = Page::new(50, usize::MAX, 500).err().unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1 .0["error"], "offset inválido");

        let last = i64::MAX as usize;
        assert_eq!(Page::new(50, last, 500).unwrap().sql_offset, i64::MAX);
    }

    #[test]
    fn test_has_more_does_not_overflow() {
        let page = Page::new(50, i64::MAX as usize, 500).unwrap();
        let response = page.response(Vec::new(), 10);
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn test_unknown_type_rejected() {
        let response = get(&format!("/api/lists/{}/content?type=podcast", Uuid::new_v4())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_huge_offset_rejected() {
        let uri = format!(
            "/api/lists/{}/content?offset={}",
            Uuid::new_v4(),
            usize::MAX
        );
        let response = get(&uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "offset inválido");
    }

    #[tokio::test]
    async fn test_search_requires_text() {
        let response = get(&format!("/api/lists/{}/search?q=%20", Uuid::new_v4())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_content_requires_user() {
        let response = get("/api/content?type=movie").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "userId é obrigatório");
    }

    #[tokio::test]
    async fn test_user_content_validates_filters() {
        let response = get("/api/content?userId=u1&type=podcast").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/content?userId=u1&offset={}", usize::MAX);
        let response = get(&uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
