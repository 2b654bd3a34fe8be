//! Error types for playlist parsing and ingestion

use axum::http::StatusCode;
use thiserror::Error;

/// Failure raised by the M3U parser.
///
/// Everything short of a missing header degrades to defaults, so this is
/// the only way `parse` can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("Invalid M3U format - must start with #EXTM3U")]
    Format,
}

/// Failures of the ingestion path (fetch, parse, persist)
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Playlist source not found")]
    NotFound,

    #[error("Playlist refresh already in progress")]
    Busy,

    #[error("Invalid playlist URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Fetch(String),

    #[error("Playlist too large: {size_mb:.1}MB (limit {limit_mb}MB)")]
    TooLarge { size_mb: f64, limit_mb: usize },

    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    #[error("No valid items found in playlist")]
    Empty,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Playlist processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IngestError {
    /// Short label used for the failure metric
    pub fn reason(&self) -> &'static str {
        match self {
            IngestError::NotFound => "not_found",
            IngestError::Busy => "busy",
            IngestError::InvalidUrl(_) => "invalid_url",
            IngestError::Fetch(_) => "fetch",
            IngestError::TooLarge { .. } => "too_large",
            IngestError::Playlist(_) => "format",
            IngestError::Empty => "empty",
            IngestError::Database(_) => "database",
            IngestError::Task(_) => "task",
        }
    }

    /// HTTP status reported to API callers
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::NotFound => StatusCode::NOT_FOUND,
            IngestError::Busy => StatusCode::CONFLICT,
            IngestError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            IngestError::Fetch(_) => StatusCode::BAD_GATEWAY,
            IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::Playlist(_) | IngestError::Empty => StatusCode::UNPROCESSABLE_ENTITY,
            IngestError::Database(_) | IngestError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the source itself should be marked as errored
    pub fn marks_source(&self) -> bool {
        !matches!(
            self,
            IngestError::NotFound
                | IngestError::Busy
                | IngestError::Database(_)
                | IngestError::Task(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(
            PlaylistError::Format.to_string(),
            "Invalid M3U format - must start with #EXTM3U"
        );
    }

    #[test]
    fn test_playlist_error_converts() {
        let err: IngestError = PlaylistError::Format.into();
        assert_eq!(err.reason(), "format");
        assert!(err.marks_source());
    }

    #[test]
    fn test_busy_does_not_mark_source() {
        assert!(!IngestError::Busy.marks_source());
        assert!(IngestError::Empty.marks_source());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(IngestError::Busy.status_code(), StatusCode::CONFLICT);
        assert_eq!(IngestError::Empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            IngestError::Fetch("HTTP 500".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(IngestError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panicked_task_is_internal() {
        let join_err = tokio::task::spawn_blocking(|| -> () { panic!("boom") })
            .await
            .unwrap_err();
        let err: IngestError = join_err.into();
        assert_eq!(err.reason(), "task");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.marks_source());
    }

    #[test]
    fn test_too_large_message() {
        let err = IngestError::TooLarge { size_mb: 120.44, limit_mb: 100 };
        assert_eq!(err.to_string(), "Playlist too large: 120.4MB (limit 100MB)");
    }
}
