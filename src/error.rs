//! Error types for the article pipeline.
//!
//! The four classified failure kinds (fetch, timeout, and the two parsing
//! kinds) are recovered inside the article processor and turned into a
//! [`ProcessingStatus`]. Anything else is an unclassified fault: it is carried
//! as an [`anyhow::Error`] and leaves the batch as a [`BatchError`].

use crate::models::ProcessingStatus;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Pipeline stage guarded by its own time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Normalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Normalize => f.write_str("normalize"),
        }
    }
}

/// Failures of the sanitizer registry and of individual sanitizers.
#[derive(Error, Debug)]
pub enum SanitizeError {
    /// No sanitizer is registered for the URL's domain key.
    #[error("no sanitizer registered for domain `{domain}`")]
    AdapterNotImplemented { domain: String },

    /// The sanitizer ran but the page lacks the expected article markup.
    #[error("article markup not found")]
    ArticleNotFound,

    /// A sanitizer bug. Not a parsing failure of the page.
    #[error("sanitizer failed: {0}")]
    Internal(#[source] anyhow::Error),
}

/// Everything that can stop one article from being scored.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("{stage} stage timed out after {limit:?}")]
    Timeout { stage: Stage, limit: Duration },

    #[error(transparent)]
    Sanitize(SanitizeError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<SanitizeError> for ArticleError {
    fn from(err: SanitizeError) -> Self {
        match err {
            SanitizeError::Internal(inner) => ArticleError::Internal(inner),
            other => ArticleError::Sanitize(other),
        }
    }
}

impl ArticleError {
    /// Status for a classified failure, `None` for an unclassified fault.
    pub fn status(&self) -> Option<ProcessingStatus> {
        match self {
            ArticleError::Fetch(_) => Some(ProcessingStatus::FetchError),
            ArticleError::Timeout { .. } => Some(ProcessingStatus::Timeout),
            ArticleError::Sanitize(SanitizeError::Internal(_)) => None,
            ArticleError::Sanitize(_) => Some(ProcessingStatus::ParsingError),
            ArticleError::Internal(_) => None,
        }
    }
}

/// Failures while loading word lists from disk.
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no words found in {path}")]
    Empty { path: PathBuf },
}

/// An unclassified fault raised by one article task.
#[derive(Error, Debug)]
#[error("article task for {url} failed: {error}")]
pub struct TaskFault {
    pub url: String,
    #[source]
    pub error: anyhow::Error,
}

/// A batch that did not produce a full result set.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Exactly one task faulted.
    #[error(transparent)]
    Task(TaskFault),

    /// Several tasks faulted; every fault is kept.
    #[error("{} article tasks failed: {}", .0.len(), join_faults(.0))]
    Group(Vec<TaskFault>),

    /// The caller cancelled the batch.
    #[error("batch cancelled")]
    Cancelled,
}

impl BatchError {
    /// `None` for an empty fault list.
    pub fn from_faults(mut faults: Vec<TaskFault>) -> Option<Self> {
        match faults.len() {
            0 => None,
            1 => faults.pop().map(BatchError::Task),
            _ => Some(BatchError::Group(faults)),
        }
    }

    pub fn faults(&self) -> &[TaskFault] {
        match self {
            BatchError::Task(fault) => std::slice::from_ref(fault),
            BatchError::Group(faults) => faults,
            BatchError::Cancelled => &[],
        }
    }
}

fn join_faults(faults: &[TaskFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Invalid or unreadable settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
