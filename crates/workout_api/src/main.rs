use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;

use sheet_store::config::Config;
use sheet_store::http_store::ReqwestSheetStore;
use workout_api::WorkoutService;

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics(handle: PrometheusHandle) -> impl IntoResponse {
    let body = handle.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from `WORKOUT_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("WORKOUT_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("workout_api: log filter: {}", log_env);

    let cfg = Config::from_env()?;

    // Install prometheus recorder
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    let store = ReqwestSheetStore::new(&cfg.base_url, &cfg.spreadsheet_id, cfg.api_token.clone());
    let service = WorkoutService::new(Arc::new(store), cfg.utc_offset);

    let app = workout_api::router(service)
        .route("/health", get(health))
        .route("/metrics", get(move || metrics(handle.clone())))
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    tracing::info!(addr = %cfg.bind_addr, "starting workout API server");
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr.as_str()).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("failed to install ctrl+c handler");
        })
        .await?;

    Ok(())
}
