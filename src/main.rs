use std::net::SocketAddr;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skincare_storefront::{config::AppConfig, events::StoreEvents, routes::create_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skincare_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    match &config.store_path {
        Some(path) => tracing::info!(path = %path.display(), "using file-backed profile"),
        None => tracing::info!("STORE_PATH not set, profile kept in memory"),
    }

    let state = AppState::new(config.open_store()?)?;
    spawn_event_logger(&state.events);

    let app = create_app(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

fn spawn_event_logger(events: &StoreEvents) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => tracing::debug!(?event, "store changed"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "store event logger fell behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
