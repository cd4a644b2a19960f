//! HTTP router setup.

use crate::content::ContentStore;
use crate::contract::DropContract;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use crate::wallet::Wallet;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create<C, D, W>(state: Arc<AppState<C, D, W>>) -> Router
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    Router::new()
        .route("/drop/{slug}", get(handlers::drop_page))
        .route("/drop/{slug}/mint", post(handlers::mint))
        .route("/wallet", post(handlers::toggle_wallet))
        .route("/notifications", get(handlers::notifications))
        .route("/health", get(handlers::health))
        .layer(axum::middleware::from_fn(middleware::inject_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
