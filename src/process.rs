//! Single-article pipeline: fetch, sanitize, normalize, score.
//!
//! Every classified failure ends the run with a status:
//!
//! | Failure | Status |
//! |---------|--------|
//! | transport error, non-2xx | `FETCH_ERROR` |
//! | fetch or normalize deadline | `TIMEOUT` |
//! | no sanitizer, no article markup | `PARSING_ERROR` |
//!
//! Anything else is returned as an error and is the batch's concern.

use crate::config::Timeouts;
use crate::context::Context;
use crate::error::{ArticleError, Stage};
use crate::fetch::fetch;
use crate::models::ArticleResult;
use crate::text::{calculate_jaundice_rate, split_by_words};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// Process one URL into an [`ArticleResult`].
///
/// # Errors
///
/// Only unclassified faults (sanitizer bugs and the like) are returned.
#[instrument(level = "info", skip(ctx, timeouts))]
pub async fn process_article(
    ctx: &Context,
    url: &str,
    timeouts: Timeouts,
) -> anyhow::Result<ArticleResult> {
    match score_article(ctx, url, timeouts).await {
        Ok((score, words_count)) => {
            info!(score, words_count, "Article scored");
            Ok(ArticleResult::ok(url, score, words_count))
        }
        Err(err) => match err.status() {
            Some(status) => {
                warn!(%status, error = %err, "Article not scored");
                Ok(ArticleResult::failed(url, status))
            }
            None => match err {
                ArticleError::Internal(inner) => Err(inner),
                other => Err(other.into()),
            },
        },
    }
}

async fn score_article(
    ctx: &Context,
    url: &str,
    timeouts: Timeouts,
) -> Result<(f64, usize), ArticleError> {
    let html = fetch(&ctx.client, url, timeouts.response).await?;

    let text = ctx.sanitizers.sanitize_html(&html, url)?;
    drop(html);

    let limit = timeouts.processing;
    let t0 = Instant::now();
    let words = match timeout(limit, split_by_words(ctx.morph.as_ref(), &text)).await {
        Ok(words) => {
            info!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                words = words.len(),
                "Analysis finished"
            );
            words
        }
        Err(_) => {
            info!(?limit, "Analysis terminated by timeout");
            return Err(ArticleError::Timeout {
                stage: Stage::Normalize,
                limit,
            });
        }
    };

    let score = calculate_jaundice_rate(words.as_slice(), &ctx.charged_words);
    Ok((score, words.len()))
}
