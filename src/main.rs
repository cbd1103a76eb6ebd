use clap::Parser;
use tokio::net::TcpListener;

use site_api::config::Args;
use site_api::error::StartupError;
use site_api::rate_limit::{RateLimiter, sweeper};
use site_api::search::SearchIndex;
use site_api::state::AppState;
use site_api::{app, logging};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // parse cli arguments
    let args = Args::parse();
    logging::init(args.log_json);

    let search_index = match &args.content_index {
        Some(path) => SearchIndex::from_json_file(path)?,
        None => SearchIndex::builtin(),
    };
    let policy = args.rate_limit_policy();
    let state = std::sync::Arc::new(AppState::new(RateLimiter::new(policy), search_index));

    // spawn the background sweeper
    let sweep_limiter = state.rate_limiter.clone();
    let sweep_every = args.sweep_every();
    tokio::spawn(async move {
        sweeper(sweep_limiter, sweep_every).await;
    });

    let addr = args.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!(
        address = %addr,
        rate_limit = policy.max_per_window,
        rate_window_ms = policy.window.as_millis() as u64,
        sweep_interval_secs = args.sweep_interval,
        catalog_entries = state.search_index.len(),
        "site-api listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("site-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
