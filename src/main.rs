use anyhow::Result;
use authbridge::application::ports::{
    authorization::AuthorizationStore, time::Clock, upstream::UpstreamClient,
};
use authbridge::application::services::{ApplicationServices, AuthFlowService, FlowConfig};
use authbridge::config::AppConfig;
use authbridge::infrastructure::stores::{MemoryAuthorizationStore, RedisAuthorizationStore};
use authbridge::infrastructure::time::SystemClock;
use authbridge::infrastructure::upstream::HttpUpstreamClient;
use authbridge::presentation::http::{routes::build_router, state::HttpState};
use axum::{ServiceExt, body::Body};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());

    let store: Arc<dyn AuthorizationStore> = match config.store_redis_url() {
        Some(url) => {
            tracing::info!("using Redis-backed authorization store");
            Arc::new(RedisAuthorizationStore::from_url(
                url,
                config.store_namespace(),
            )?)
        }
        None => {
            if config.require_shared_store() {
                anyhow::bail!(
                    "BRIDGE_REQUIRE_SHARED_STORE is set but STORE_REDIS_URL is not configured"
                );
            }
            tracing::info!("using in-process authorization store (single instance only)");
            let store = Arc::new(MemoryAuthorizationStore::new(Arc::clone(&clock)));
            MemoryAuthorizationStore::spawn_sweeper(Arc::clone(&store), SWEEP_PERIOD);
            store
        }
    };

    let flow_config = FlowConfig {
        upstream_base_url: config.upstream_base_url().to_string(),
        bridge_base_url: config.bridge_base_url().to_string(),
        upstream_client_id: config.upstream_client_id().to_string(),
        default_client_id: config.default_client_id().to_string(),
    };

    let callback_url = format!(
        "{}/oauth/callback",
        config.bridge_base_url().trim_end_matches('/')
    );
    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstreamClient::new(
        config.upstream_base_url(),
        config.upstream_client_id(),
        config.upstream_client_secret(),
        &callback_url,
        config.upstream_timeout(),
    )?);

    let flow = AuthFlowService::new(store, upstream, clock, flow_config);
    let services = Arc::new(ApplicationServices::new(flow));
    let state = HttpState { services };

    let app = build_router(state);
    let service = app.into_service::<Body>().into_make_service();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
