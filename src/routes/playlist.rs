use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::time::Instant;

use crate::models::{ParseRequest, ParseResponse};
use crate::routes::{api_error, ApiError};
use crate::services::ingest::categorize_in_background;
use crate::AppState;

/// POST /api/playlist/parse - Parse a playlist the client already downloaded
///
/// Nothing is persisted; the response carries the four buckets and counts.
/// Parsing runs on the blocking pool.
pub async fn parse_playlist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let size = payload.content.len() as u64;
    if size > state.config.max_m3u_bytes() {
        return Err(api_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "Playlist too large: {:.1}MB (limit {}MB)",
                size as f64 / 1024.0 / 1024.0,
                state.config.max_m3u_size_mb
            ),
        ));
    }

    let ParseRequest { content, source_url } = payload;

    let start = Instant::now();
    let batch = categorize_in_background(content)
        .await
        .map_err(|e| api_error(e.status_code(), e.to_string()))?;
    let stats = batch.stats();

    tracing::info!(
        total = stats.total_items,
        live = stats.channel_count,
        movies = stats.movie_count,
        series = stats.series_count,
        radio = stats.radio_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Playlist parsed"
    );

    Ok(Json(ParseResponse {
        success: true,
        source_url,
        stats,
        live: batch.live,
        movies: batch.movies,
        series: batch.series,
        radio: batch.radio,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    fn parse_request(content: &str) -> Request<Body> {
        let body = serde_json::json!({
            "content": content,
            "sourceUrl": "http://example.com/list.m3u"
        });
        Request::post("/api/playlist/parse")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_parse_playlist() {
        let content = "#EXTM3U\n\
#EXTINF:-1 tvg-id=\"espn\" group-title=\"Esportes\",ESPN HD\n\
http://stream.example/espn.m3u8\n\
#EXTINF:-1 group-title=\"Filmes\",Duro de Matar (1988)\n\
http://stream.example/film1.mp4\n\
#EXTINF:-1 radio=\"true\" group-title=\"Rádios\",Rádio Nova\n\
http://radio.example/nova\n";

        let response = test_support::send(test_support::state(), parse_request(content)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["sourceUrl"], "http://example.com/list.m3u");
        assert_eq!(body["stats"]["totalItems"], 3);
        assert_eq!(body["stats"]["channelCount"], 1);
        assert_eq!(body["stats"]["movieCount"], 1);
        assert_eq!(body["stats"]["radioCount"], 1);
        assert_eq!(body["live"][0]["name"], "ESPN HD");
        assert_eq!(body["live"][0]["attributes"]["tvg-id"], "espn");
        assert_eq!(body["movies"][0]["type"], "movie");
        assert_eq!(body["movies"][0]["year"], 1988);
        assert_eq!(body["movies"][0]["rating"], "L");
        assert_eq!(body["radio"][0]["isRadio"], true);
    }

    #[tokio::test]
    async fn test_parse_rejects_missing_header() {
        let response = test_support::send(
            test_support::state(),
            parse_request("#EXTINF:-1,X\nhttp://a\n"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = test_support::json_body(response).await;
        assert_eq!(body["error"], "Invalid M3U format - must start with #EXTM3U");
    }

    #[tokio::test]
    async fn test_parse_header_only() {
        let response = test_support::send(test_support::state(), parse_request("#EXTM3U")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::json_body(response).await;
        assert_eq!(body["stats"]["totalItems"], 0);
        assert_eq!(body["live"].as_array().map(Vec::len), Some(0));
    }
}
