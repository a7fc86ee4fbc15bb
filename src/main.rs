//! # Jaundice Rate
//!
//! Command-line entry point: rate articles once (`check`) or serve the HTTP
//! interface (`serve`).
//!
//! ## Usage
//!
//! ```sh
//! jaundice_rate check https://inosmi.ru/social/20191129/246343400.html
//! jaundice_rate --config jaundice.yaml serve
//! ```

use anyhow::Context as _;
use clap::Parser;
use jaundice_rate::api::{self, AppState};
use jaundice_rate::cli::{Cli, Command};
use jaundice_rate::{Context, Settings, process_all_until};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut settings = match &args.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };
    args.apply(&mut settings);
    settings.validate()?;
    info!(?settings, "Settings resolved");

    let ctx = Arc::new(Context::from_settings(&settings).await?);

    match args.command {
        Command::Serve { .. } => serve(ctx, &settings).await?,
        Command::Check { urls, pretty } => check(ctx, &settings, &urls, pretty).await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(bind = %settings.bind))]
async fn serve(ctx: Arc<Context>, settings: &Settings) -> anyhow::Result<()> {
    let state = AppState {
        ctx,
        timeouts: settings.timeouts(),
        max_urls: settings.max_urls,
    };
    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")
}

#[instrument(level = "info", skip_all, fields(count = urls.len()))]
async fn check(
    ctx: Arc<Context>,
    settings: &Settings,
    urls: &[String],
    pretty: bool,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling batch");
            on_interrupt.cancel();
        }
    });

    let outcome = process_all_until(ctx, urls, settings.timeouts(), cancel).await;
    watcher.abort();
    let results = outcome?;

    let json = if pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{json}");
    Ok(())
}
