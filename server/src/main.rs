mod auth;
mod email;
mod error;
mod model;
mod request_tracing;
mod routes;
mod server_config;
mod sheets;
#[cfg(test)]
mod testing;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use auth::google::{AuthorizedUserCredentials, ServiceAccountKey};
use axum::extract::FromRef;
use mimalloc::MiMalloc;
use routes::AppRouter;
use server_config::ServerConfig;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub type HttpClient = reqwest::Client;

#[derive(Clone, FromRef)]
pub struct ServerState {
    http_client: HttpClient,
    config: Arc<ServerConfig>,
    gmail_credentials: Arc<AuthorizedUserCredentials>,
    sheets_key: Arc<ServiceAccountKey>,
}

impl ServerState {
    /// Reads both credential files up front so a bad deployment fails at boot.
    fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let gmail_credentials = AuthorizedUserCredentials::from_file(&config.gmail.credentials_path)
            .context("Gmail credentials are required")?;
        let sheets_key = ServiceAccountKey::from_file(&config.sheets.credentials_path)
            .context("Service account key is required")?;
        let http_client = reqwest::ClientBuilder::new().use_rustls_tls().build()?;

        Ok(Self {
            http_client,
            config: Arc::new(config),
            gmail_credentials: Arc::new(gmail_credentials),
            sheets_key: Arc::new(sheets_key),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::Layer::default().with_ansi(false))
        .init();

    let config = ServerConfig::load()?;
    tracing::info!("{}", config);

    let port = config.server.port;
    let state = ServerState::from_config(config)?;
    let router = AppRouter::create(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("RFQ server running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {:?}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install signal handler: {:?}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
