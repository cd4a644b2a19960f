//! Drop page binary.

use drop_page::{create_router, AppState, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting drop page");

    let config: Config = config::Config::builder()
        .add_source(config::File::with_name("droppage").required(false))
        .add_source(config::Environment::with_prefix("DROP_PAGE"))
        .build()?
        .try_deserialize()
        .unwrap_or_default();

    info!(
        content_api = %config.content_api_url,
        rpc = %config.rpc_url,
        "Configuration loaded"
    );

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::from_config(config));
    let app = create_router(state);

    info!(address = %bind_address, "Listening");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
