use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::{FavoriteRequest, FavoriteStatus, FavoritesResponse, UserQuery};
use crate::routes::{api_error, internal_error, required_text, ApiError};
use crate::AppState;

fn unknown_item() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Conteúdo não encontrado")
}

fn favorite_status(content_id: String, favorite: bool) -> Json<FavoriteStatus> {
    Json(FavoriteStatus { content_id, favorite })
}

/// GET /api/favorites?userId= - Favorite items, most recent first
pub async fn get_favorites(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let user_id = required_text(&query.user_id, "userId")?;
    let items = state
        .store
        .favorites(&user_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(FavoritesResponse {
        total: items.len(),
        items,
    }))
}

/// POST /api/favorites - Mark an item of one of the user's sources
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = required_text(&payload.user_id, "userId")?;
    let content_id = required_text(&payload.content_id, "contentId")?;

    let added = state
        .store
        .add_favorite(&user_id, &content_id)
        .await
        .map_err(internal_error)?;
    if !added {
        return Err(unknown_item());
    }

    Ok((StatusCode::CREATED, favorite_status(content_id, true)))
}

/// POST /api/favorites/toggle
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let user_id = required_text(&payload.user_id, "userId")?;
    let content_id = required_text(&payload.content_id, "contentId")?;

    let favorite = state
        .store
        .toggle_favorite(&user_id, &content_id)
        .await
        .map_err(internal_error)?
        .ok_or_else(unknown_item)?;

    tracing::debug!(user_id = %user_id, content_id = %content_id, favorite, "Favorite toggled");
    Ok(favorite_status(content_id, favorite))
}

/// GET /api/favorites/:content_id?userId=
pub async fn get_favorite(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let user_id = required_text(&query.user_id, "userId")?;
    let favorite = state
        .store
        .is_favorite(&user_id, &content_id)
        .await
        .map_err(internal_error)?;

    Ok(favorite_status(content_id, favorite))
}

/// DELETE /api/favorites/:content_id?userId=
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let user_id = required_text(&query.user_id, "userId")?;
    let removed = state
        .store
        .remove_favorite(&user_id, &content_id)
        .await
        .map_err(internal_error)?;
    if !removed {
        return Err(api_error(StatusCode::NOT_FOUND, "Favorito não encontrado"));
    }

    Ok(favorite_status(content_id, false))
}
