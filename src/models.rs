//! Data models for processed articles.
//!
//! This module defines the values produced by the article pipeline:
//! - [`ProcessingStatus`]: terminal classification of one article run
//! - [`ArticleResult`]: the per-URL outcome returned to CLI and HTTP callers
//!
//! Field names follow the JSON contract of the HTTP interface
//! (`status`, `url`, `score`, `words_count`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification of one article's pipeline run.
///
/// Serialized as the upper-case variant name (`"OK"`, `"FETCH_ERROR"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// Article fetched, extracted, normalized and scored.
    Ok,
    /// Transport failure or non-success HTTP status.
    FetchError,
    /// No sanitizer for the domain, or the page is not an article.
    ParsingError,
    /// Fetch or normalization exceeded its time budget.
    Timeout,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Ok => "OK",
            ProcessingStatus::FetchError => "FETCH_ERROR",
            ProcessingStatus::ParsingError => "PARSING_ERROR",
            ProcessingStatus::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing a single URL.
///
/// `score` and `words_count` are present exactly when the status is
/// [`ProcessingStatus::Ok`]. The constructors are the only way to build a
/// value, so the pairing cannot be broken after creation.
///
/// # JSON
///
/// ```text
/// {"status": "OK", "url": "https://inosmi.ru/...", "score": 1.25, "words_count": 480}
/// {"status": "TIMEOUT", "url": "https://inosmi.ru/...", "score": null, "words_count": null}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleResult {
    status: ProcessingStatus,
    url: String,
    score: Option<f64>,
    words_count: Option<usize>,
}

impl ArticleResult {
    /// A successfully scored article.
    pub fn ok(url: impl Into<String>, score: f64, words_count: usize) -> Self {
        Self {
            status: ProcessingStatus::Ok,
            url: url.into(),
            score: Some(score.max(0.0)),
            words_count: Some(words_count),
        }
    }

    /// A failed article.
    ///
    /// # Panics
    ///
    /// In debug builds, when `status` is [`ProcessingStatus::Ok`]. Release
    /// builds report such a call as a zero-word article so the `OK` ⇔
    /// non-null invariant still holds.
    pub fn failed(url: impl Into<String>, status: ProcessingStatus) -> Self {
        debug_assert_ne!(
            status,
            ProcessingStatus::Ok,
            "ArticleResult::failed needs a failure status"
        );
        if status == ProcessingStatus::Ok {
            return Self::ok(url, 0.0, 0);
        }
        Self {
            status,
            url: url.into(),
            score: None,
            words_count: None,
        }
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn words_count(&self) -> Option<usize> {
        self.words_count
    }
}
