//! Playlist download for the batch ingestion path
//!
//! The parser only ever sees an already-downloaded string; this module
//! owns timeouts, retries, HTTP status handling and the size bound.

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::IngestError;

/// HTTP fetcher for M3U documents
#[derive(Clone)]
pub struct PlaylistFetcher {
    client: Client,
    max_retries: u32,
    max_bytes: u64,
}

impl PlaylistFetcher {
    /// Create a new fetcher
    pub fn new(
        user_agent: &str,
        timeout_ms: u64,
        max_retries: u32,
        max_bytes: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_retries,
            max_bytes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.user_agent,
            config.fetch_timeout_ms,
            config.max_retries,
            config.max_m3u_bytes(),
        )
    }

    /// Download a playlist as text, bounded by the configured size
    pub async fn fetch(&self, url: &str) -> Result<String, IngestError> {
        validate_url(url)?;

        let response = self.fetch_with_retry(url).await?;
        let body = self.read_bounded(response).await?;

        tracing::info!(
            url = url,
            size_mb = body.len() as f64 / 1024.0 / 1024.0,
            "Playlist downloaded"
        );

        // Best effort: third-party playlists are not always valid UTF-8
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<Response, IngestError> {
        let mut attempt = 0u32;

        loop {
            match self.client.get(url).header("Accept", "*/*").send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        if let Some(len) = resp.content_length() {
                            self.check_size(len)?;
                        }
                        return Ok(resp);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                        let backoff_ms = backoff_ms(attempt);
                        tracing::warn!(fetch_retry = attempt + 1, reason = "429", backoff_ms = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(IngestError::Fetch(status_message(status)));
                }
                Err(err) => {
                    if attempt < self.max_retries && !err.is_builder() {
                        let backoff_ms = backoff_ms(attempt);
                        tracing::warn!(fetch_retry = attempt + 1, reason = "network", backoff_ms = backoff_ms);
                        sleep(Duration::from_millis(backoff_ms)).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(IngestError::Fetch(format!("Failed to fetch playlist: {}", err)));
                }
            }
        }
    }

    /// Read the body, aborting as soon as it grows past the limit
    async fn read_bounded(&self, response: Response) -> Result<Vec<u8>, IngestError> {
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| IngestError::Fetch(format!("Failed to read playlist: {}", e)))?;
            body.extend_from_slice(&chunk);
            self.check_size(body.len() as u64)?;
        }

        Ok(body)
    }

    fn check_size(&self, len: u64) -> Result<(), IngestError> {
        if len > self.max_bytes {
            return Err(IngestError::TooLarge {
                size_mb: len as f64 / 1024.0 / 1024.0,
                limit_mb: (self.max_bytes / 1024 / 1024) as usize,
            });
        }
        Ok(())
    }
}

/// Only absolute http(s) URLs are fetched
pub fn validate_url(raw: &str) -> Result<url::Url, IngestError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| IngestError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(IngestError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

/// Exponential backoff: 500ms, 1s, 2s, ... capped at 10s
fn backoff_ms(attempt: u32) -> u64 {
    (1u64 << attempt.min(16)).saturating_mul(500).min(10_000)
}

/// User-facing message for a failed HTTP status
fn status_message(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "Playlist não encontrada (404). Verifique a URL.".to_string(),
        StatusCode::FORBIDDEN => {
            "Acesso negado (403). A playlist pode exigir autenticação.".to_string()
        }
        StatusCode::TOO_MANY_REQUESTS => {
            "Muitas requisições (429). O servidor do M3U está limitando acessos.".to_string()
        }
        _ => {
            let reason = status.canonical_reason().unwrap_or("Erro");
            format!("HTTP {}: {}", status.as_u16(), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://example.com/list.m3u").is_ok());
        assert!(validate_url(" https://example.com/get.php?type=m3u_plus ").is_ok());
        assert!(matches!(validate_url("ftp://example.com/list.m3u"), Err(IngestError::InvalidUrl(_))));
        assert!(matches!(validate_url("not a url"), Err(IngestError::InvalidUrl(_))));
    }

    #[test]
    fn test_backoff() {
        assert_eq!(backoff_ms(0), 500);
        assert_eq!(backoff_ms(1), 1000);
        assert_eq!(backoff_ms(2), 2000);
        assert_eq!(backoff_ms(10), 10_000);
        assert_eq!(backoff_ms(40), 10_000);
    }

    #[test]
    fn test_status_message() {
        assert!(status_message(StatusCode::NOT_FOUND).contains("404"));
        assert!(status_message(StatusCode::FORBIDDEN).contains("403"));
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY),
            "HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn test_check_size() {
        let fetcher = PlaylistFetcher::new("test", 1000, 0, 1024 * 1024).unwrap();
        assert!(fetcher.check_size(1024).is_ok());
        assert!(matches!(
            fetcher.check_size(2 * 1024 * 1024),
            Err(IngestError::TooLarge { limit_mb: 1, .. })
        ));
    }
}
