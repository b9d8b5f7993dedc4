//! HTTP control surface.
//!
//! Routes map one-to-one onto fixed cluster operations; nothing is kept
//! between requests apart from the shared client handles and counters.

pub mod handlers;
pub mod probe;
pub mod report;

use crate::config::Settings;
use crate::k8s::HarnessClient;
use crate::metrics::{MetricsCollector, PrometheusExporter};
use crate::Result;
use axum::routing::{delete, get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub client: HarnessClient,
    pub http: reqwest::Client,
    pub settings: Arc<Settings>,
    pub metrics: MetricsCollector,
    pub exporter: Arc<PrometheusExporter>,
}

impl AppState {
    pub fn new(client: HarnessClient, settings: Settings) -> Result<Self> {
        let http = probe::build_http_client(settings.probe_timeout)?;
        let metrics = MetricsCollector::new()?;
        let exporter = Arc::new(PrometheusExporter::new(metrics.clone()));

        Ok(Self {
            client,
            http,
            settings: Arc::new(settings),
            metrics,
            exporter,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthy", get(handlers::healthy))
        .route("/ready", get(handlers::ready))
        .route("/test", get(handlers::smoke_test))
        .route("/install", post(handlers::install))
        .route("/uninstall", delete(handlers::uninstall))
        .route("/installNotifications", post(handlers::install_notifications))
        .route(
            "/uninstallNotifications",
            delete(handlers::uninstall_notifications),
        )
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM, then drain in-flight requests.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
