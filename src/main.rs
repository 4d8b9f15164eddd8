//! OpenSASE Catalog - listing query service

use anyhow::Result;
use opensase_catalog::http::{load_snapshot, router, AppState};
use opensase_catalog::CatalogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = CatalogConfig::from_env()?;
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let snapshot = load_snapshot(&config).await;
    let port = config.port;
    let app = router(AppState::new(snapshot, config));

    tracing::info!("🚀 OpenSASE Catalog listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
