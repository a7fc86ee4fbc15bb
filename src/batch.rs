//! Concurrent processing of a batch of article URLs.
//!
//! One task per URL is spawned on a [`JoinSet`]. Results are stored by input
//! position, so the returned list follows input order whatever the
//! completion order.
//!
//! # Faults
//!
//! A task that returns an unclassified error or panics is a fault. The first
//! fault aborts the still-running siblings; the set is then drained and every
//! fault collected is returned, a single one as [`BatchError::Task`], several
//! as [`BatchError::Group`]. Classified failures never reach this level: they
//! are already statuses inside [`ArticleResult`].
//!
//! # Cancellation
//!
//! [`process_all_until`] stops when its token is cancelled: all children are
//! aborted and awaited before it returns. Dropping either future drops the
//! set, which aborts every child.

use crate::config::Timeouts;
use crate::context::Context;
use crate::error::{BatchError, TaskFault};
use crate::models::{ArticleResult, ProcessingStatus};
use crate::process::process_article;
use anyhow::anyhow;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Process every URL concurrently and return one result per URL, in order.
pub async fn process_all(
    ctx: Arc<Context>,
    urls: &[String],
    timeouts: Timeouts,
) -> Result<Vec<ArticleResult>, BatchError> {
    process_all_until(ctx, urls, timeouts, CancellationToken::new()).await
}

/// [`process_all`] that gives up with [`BatchError::Cancelled`] once `cancel`
/// fires.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn process_all_until(
    ctx: Arc<Context>,
    urls: &[String],
    timeouts: Timeouts,
    cancel: CancellationToken,
) -> Result<Vec<ArticleResult>, BatchError> {
    info!("Starting batch");

    let mut tasks = JoinSet::new();
    let mut task_urls: HashMap<Id, usize> = HashMap::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let ctx = Arc::clone(&ctx);
        let url = url.clone();
        let handle = tasks.spawn(async move {
            let outcome = AssertUnwindSafe(process_article(&ctx, &url, timeouts))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(anyhow!("article task panicked: {}", panic_message(payload.as_ref())))
                });
            (index, outcome)
        });
        task_urls.insert(handle.id(), index);
    }

    let mut slots: Vec<Option<ArticleResult>> = urls.iter().map(|_| None).collect();
    let mut faults: Vec<TaskFault> = Vec::new();

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(running = tasks.len(), "Batch cancelled; stopping article tasks");
                tasks.shutdown().await;
                return Err(BatchError::Cancelled);
            }
            joined = tasks.join_next() => joined,
        };
        let Some(joined) = joined else {
            break;
        };

        match joined {
            Ok((index, Ok(result))) => slots[index] = Some(result),
            Ok((index, Err(error))) => {
                error!(url = %urls[index], error = %error, "Article task faulted");
                if faults.is_empty() {
                    tasks.abort_all();
                }
                faults.push(TaskFault {
                    url: urls[index].clone(),
                    error,
                });
            }
            Err(join_error) if join_error.is_cancelled() => {}
            Err(join_error) => {
                let fault = join_fault(join_error, &task_urls, urls);
                error!(url = %fault.url, error = %fault.error, "Article task failed to join");
                if faults.is_empty() {
                    tasks.abort_all();
                }
                faults.push(fault);
            }
        }
    }

    if let Some(err) = BatchError::from_faults(faults) {
        error!(faults = err.faults().len(), "Batch failed");
        return Err(err);
    }

    let results: Vec<ArticleResult> = slots.into_iter().flatten().collect();
    let count = |status: ProcessingStatus| results.iter().filter(|r| r.status() == status).count();
    info!(
        total = results.len(),
        ok = count(ProcessingStatus::Ok),
        fetch_error = count(ProcessingStatus::FetchError),
        parsing_error = count(ProcessingStatus::ParsingError),
        timeout = count(ProcessingStatus::Timeout),
        "Batch complete"
    );
    Ok(results)
}

/// Attribute a join failure to the URL its task was spawned for.
fn join_fault(join_error: JoinError, task_urls: &HashMap<Id, usize>, urls: &[String]) -> TaskFault {
    let url = task_urls
        .get(&join_error.id())
        .and_then(|&index| urls.get(index))
        .cloned()
        .unwrap_or_default();
    TaskFault {
        url,
        error: anyhow!(join_error),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
