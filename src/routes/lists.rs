use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{CreateListRequest, IngestReport, UserQuery, ListsResponse, M3uList, UpdateListRequest};
use crate::routes::{api_error, internal_error, required_text, ApiError};
use crate::services::fetcher::validate_url;
use crate::AppState;

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Lista não encontrada")
}

fn checked_url(url: &str) -> Result<String, ApiError> {
    validate_url(url)
        .map(|_| url.trim().to_string())
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

/// POST /api/lists - Register a source (starts inactive)
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = required_text(&payload.user_id, "userId")?;
    let name = required_text(&payload.name, "name")?;
    let url = checked_url(&payload.url)?;

    let list = state
        .store
        .create_list(&user_id, &name, &url)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/lists?userId= - Sources of a user, newest first
pub async fn get_lists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ListsResponse>, ApiError> {
    let user_id = required_text(&query.user_id, "userId")?;
    let lists = state
        .store
        .lists_for_user(&user_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(ListsResponse {
        total: lists.len(),
        lists,
    }))
}

/// GET /api/lists/:id
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<M3uList>, ApiError> {
    state
        .store
        .get_list(id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

/// PATCH /api/lists/:id - Rename or change URL
pub async fn update_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListRequest>,
) -> Result<Json<M3uList>, ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(|n| required_text(n, "name"))
        .transpose()?;
    let url = payload.url.as_deref().map(checked_url).transpose()?;

    state
        .store
        .update_list(id, name.as_deref(), url.as_deref())
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

/// DELETE /api/lists/:id - Delete source and its content
pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if state.ingest.locks().is_refreshing(id) {
        return Err(api_error(
            StatusCode::CONFLICT,
            "Atualização em andamento para esta lista",
        ));
    }

    let deleted = state.store.delete_list(id).await.map_err(internal_error)?;
    if !deleted {
        return Err(not_found());
    }

    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}

/// POST /api/lists/:id/toggle - Active <-> inactive
pub async fn toggle_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<M3uList>, ApiError> {
    state
        .store
        .toggle_list(id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(not_found)
}

/// POST /api/lists/:id/refresh - Download, classify and replace content
pub async fn refresh_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngestReport>, ApiError> {
    state
        .ingest
        .refresh(id)
        .await
        .map(Json)
        .map_err(|e| api_error(e.status_code(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::test_support;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use uuid::Uuid;

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_bad_url() {
        let response = test_support::send(
            test_support::state(),
            json_request(
                "POST",
                "/api/lists",
                serde_json::json!({ "userId": "u1", "name": "Minha lista", "url": "ftp://x/list.m3u" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let response = test_support::send(
            test_support::state(),
            json_request(
                "POST",
                "/api/lists",
                serde_json::json!({ "userId": "u1", "name": "  ", "url": "http://x/list.m3u" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "name é obrigatório");
    }

    #[tokio::test]
    async fn test_update_rejects_bad_url() {
        let uri = format!("/api/lists/{}", Uuid::new_v4());
        let response = test_support::send(
            test_support::state(),
            json_request("PATCH", &uri, serde_json::json!({ "url": "not a url" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_in_progress_conflicts() {
        let state = test_support::state();
        let id = Uuid::new_v4();
        let _guard = state.ingest.locks().try_acquire(id).unwrap();

        let uri = format!("/api/lists/{}/refresh", id);
        let response = test_support::send(
            state.clone(),
            Request::post(uri.as_str()).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let delete = test_support::send(
            state,
            Request::delete(format!("/api/lists/{}", id).as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(delete.status(), StatusCode::CONFLICT);
    }
}
