use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagsweep_api::config::ServerConfig;
use tagsweep_api::router::build_app_router;
use tagsweep_api::state::AppState;
use tagsweep_core::prefs::PrefStore;
use tagsweep_zabbix::{ZabbixClient, ZabbixConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Tracing first so configuration problems are visible.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagsweep_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Server configuration loaded");

    // --- Zabbix client ---
    let zabbix_url = std::env::var("ZABBIX_URL").expect("ZABBIX_URL must be set");
    let api_token = std::env::var("ZABBIX_API_TOKEN").expect("ZABBIX_API_TOKEN must be set");

    let zabbix_config = ZabbixConfig::new(zabbix_url, api_token)
        .with_timeout(Duration::from_secs(config.request_timeout_secs));
    let zabbix = ZabbixClient::new(zabbix_config).expect("Failed to build Zabbix client");

    // Probe the server once at startup. The API stays up when Zabbix is
    // down; requests fail individually and /health reports degraded.
    match zabbix.ping().await {
        Ok(version) => tracing::info!(%version, "Connected to Zabbix"),
        Err(error) => tracing::warn!(%error, "Zabbix not reachable at startup"),
    }

    // --- Preference store ---
    let prefs = PrefStore::open(&config.prefs_path).expect("Failed to open preference store");
    tracing::info!(path = %config.prefs_path, "Preference store ready");

    let state = AppState {
        zabbix: Arc::new(zabbix),
        prefs: Arc::new(prefs),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Resolve when the process is asked to stop.
///
/// Listens for SIGINT (Ctrl-C) and, on Unix, SIGTERM, so both an
/// interactive stop and a process manager's stop drain in-flight
/// requests before exit.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
