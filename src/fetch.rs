//! Article page download.

use crate::error::{ArticleError, Stage};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, instrument};

/// GET `url` and return the decoded body.
///
/// The whole exchange (connect, status line, body) must finish within
/// `limit`. A single attempt is made; there are no retries.
///
/// # Errors
///
/// - [`ArticleError::Fetch`] on transport failure or a non-2xx status
/// - [`ArticleError::Timeout`] with [`Stage::Fetch`] when `limit` elapses,
///   including timeouts reported by the client itself
#[instrument(level = "info", skip(client))]
pub async fn fetch(client: &Client, url: &str, limit: Duration) -> Result<String, ArticleError> {
    let t0 = Instant::now();
    let request = async {
        let response = client.get(url).send().await?.error_for_status()?;
        response.text().await
    };

    let timed_out = ArticleError::Timeout {
        stage: Stage::Fetch,
        limit,
    };
    match timeout(limit, request).await {
        Ok(Ok(body)) => {
            debug!(
                bytes = body.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Fetched article page"
            );
            Ok(body)
        }
        Ok(Err(e)) if e.is_timeout() => Err(timed_out),
        Ok(Err(e)) => Err(ArticleError::Fetch(e)),
        Err(_) => Err(timed_out),
    }
}
