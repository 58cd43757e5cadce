use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::{MatchedPath, Request},
    routing::get,
};
use config::Config;
use dashboard::Dashboard;
use reqwest::ClientBuilder;
use state::AppState;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::endpoints::*;

pub mod config;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod state;

#[tokio::main]
async fn main() {
    let service_name = env!("CARGO_CRATE_NAME");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{service_name}=debug,tower_http=info,axum::rejection=trace").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_file(false),
        )
        .init();

    let config = match Config::new() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err:#}");
            std::process::exit(1);
        }
    };

    let page = match build_page(&config).await {
        Ok(page) => page,
        Err(err) => {
            tracing::error!("error building dashboard: {err:#}");
            std::process::exit(1);
        }
    };

    let state = AppState {
        page: Bytes::from(page),
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("error binding listener");
    tracing::info!("dashboard on http://{}", listener.local_addr().expect("local addr"));

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("error serving dashboard");
}

/// Runs the whole pipeline once: fetch, clean, aggregate, classify, render.
async fn build_page(config: &Config) -> Result<String, anyhow::Error> {
    tracing::info!(
        groups = config.groups.len(),
        excluded = config.excluded_categories.len(),
        cutoff = %config.cutoff,
        "building dashboard"
    );

    let client = ClientBuilder::new()
        .build()
        .context("error creating client")?;

    let loaded = ingest::load(&client, config).await?;
    if !loaded.skipped.is_empty() {
        tracing::warn!(skipped = loaded.skipped.len(), "some rows could not be read");
    }

    let expenses = pipeline::run(loaded.rows, &config.filters(), &config.groups)?;
    let dashboard = Dashboard::build(&expenses);

    dashboard::page::render(&dashboard).context("error rendering dashboard")
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::get_home))
        .fallback(home::not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or("{unknown}");

                tracing::info_span!(
                    "request",
                    method = ?request.method(),
                    matched_path,
                    path = %request.uri().path(),
                )
            }),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("error installing ctrl+c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("error installing signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
