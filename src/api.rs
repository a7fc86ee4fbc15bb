//! HTTP interface.
//!
//! A single route rates the articles named in the `urls` query parameter:
//!
//! ```text
//! GET /?urls=https://inosmi.ru/a.html,https://inosmi.ru/b.html
//! ```
//!
//! | Situation | Status | Body |
//! |-----------|--------|------|
//! | `urls` missing or empty | 400 | `{"error": "no urls given"}` |
//! | more than `max_urls` URLs | 400 | `{"error": "too many urls in request, should be 10 or less"}` |
//! | batch finished | 200 | array of results, in request order |
//! | batch faulted | 500 | `{"error": "internal error"}` |

use crate::batch::process_all;
use crate::config::Timeouts;
use crate::context::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

/// State shared by every request.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Clients, lexicon, normalizer and sanitizers used by article tasks.
    pub ctx: Arc<Context>,
    /// Per-article budgets applied to every URL of a request.
    pub timeouts: Timeouts,
    /// Requests naming more URLs are answered with 400.
    pub max_urls: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(rate_articles))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RateParams {
    urls: Option<String>,
}

/// Split the raw `urls` value; trailing commas are ignored.
pub fn split_urls(raw: &str) -> Vec<String> {
    raw.trim_end_matches(',')
        .split(',')
        .map(str::to_string)
        .collect()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

#[instrument(level = "info", skip_all)]
async fn rate_articles(State(state): State<AppState>, Query(params): Query<RateParams>) -> Response {
    let Some(raw) = params.urls.filter(|raw| !raw.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "no urls given");
    };

    let urls = split_urls(&raw);
    if urls.len() > state.max_urls {
        info!(count = urls.len(), max = state.max_urls, "Rejected oversized request");
        return error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "too many urls in request, should be {} or less",
                state.max_urls
            ),
        );
    }

    match process_all(Arc::clone(&state.ctx), &urls, state.timeouts).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            error!(error = %e, "Batch failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
