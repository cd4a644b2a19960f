//! HTTP request handlers.

use crate::content::ContentStore;
use crate::contract::DropContract;
use crate::error::MintError;
use crate::middleware::RequestId;
use crate::page::{PageEvent, PageState};
use crate::response::{HealthResponse, MintResponse, WalletResponse};
use crate::state::AppState;
use crate::view;
use crate::wallet::Wallet;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use ethers_core::types::{Address, U256};
use ethers_core::utils::to_checksum;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Server-side page load: content lookup, then both contract reads.
/// `GET /drop/{slug}`
pub async fn drop_page<C, D, W>(
    State(state): State<Arc<AppState<C, D, W>>>,
    Path(slug): Path<String>,
) -> Response
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let collection = match state.content.collection(&slug).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            info!(slug = %slug, "No collection for slug");
            return (StatusCode::NOT_FOUND, Html(view::render_not_found(&slug))).into_response();
        }
        Err(e) => {
            error!(slug = %slug, error = %e, "Content lookup failed");
            return e.into_response();
        }
    };

    let mut page = PageState::new();
    match collection.address.parse::<Address>() {
        Ok(contract) => {
            page.apply(PageEvent::SupplyRequested);
            page.apply(PageEvent::PriceRequested);

            // Two independent reads; neither blocks the other and either
            // may fail without taking the page down.
            let (supply, conditions) = tokio::join!(
                state.contract.supply(contract),
                state.contract.claim_conditions(contract),
            );

            page.apply(match supply {
                Ok(supply) => PageEvent::SupplyLoaded(supply),
                Err(e) => {
                    warn!(slug = %slug, error = %e, "Supply read failed");
                    PageEvent::SupplyFailed(e.to_string())
                }
            });
            page.apply(match conditions {
                Ok(conditions) => match conditions.first() {
                    Some(condition) => PageEvent::PriceLoaded(condition.price_in_eth()),
                    None => PageEvent::PriceFailed("no claim conditions".to_string()),
                },
                Err(e) => {
                    warn!(slug = %slug, error = %e, "Price read failed");
                    PageEvent::PriceFailed(e.to_string())
                }
            });
        }
        Err(e) => {
            warn!(slug = %slug, address = %collection.address, error = %e, "Collection has an invalid contract address");
            page.apply(PageEvent::SupplyFailed("invalid contract address".to_string()));
            page.apply(PageEvent::PriceFailed("invalid contract address".to_string()));
        }
    }

    let wallet = state.wallet.address().map(|address| to_checksum(&address, None));
    Html(view::render_drop_page(
        &state.config.marketplace_name,
        &collection,
        &page,
        wallet.as_deref(),
    ))
    .into_response()
}

/// Claim one unit to the connected wallet. `POST /drop/{slug}/mint`
pub async fn mint<C, D, W>(
    State(state): State<Arc<AppState<C, D, W>>>,
    Path(slug): Path<String>,
    axum::Extension(RequestId(req_id)): axum::Extension<RequestId>,
) -> (StatusCode, Json<MintResponse>)
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    state.request_count.fetch_add(1, Ordering::Relaxed);

    // Preconditions: connected wallet, resolvable collection. The rendered
    // button is disabled in these states, so these are direct requests.
    let receiver = match state.wallet.address() {
        Some(address) => address,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MintResponse::err("connect a wallet before minting")),
            );
        }
    };

    let collection = match state.content.collection(&slug).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(MintResponse::err("no collection for slug")),
            );
        }
        Err(e) => {
            error!(slug = %slug, error = %e, "Content lookup failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(MintResponse::err("content API unavailable")),
            );
        }
    };

    let contract: Address = match collection.address.parse() {
        Ok(address) => address,
        Err(_) => {
            error!(slug = %slug, address = %collection.address, "Invalid contract address on record");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MintResponse::err("collection record is misconfigured")),
            );
        }
    };

    info!(req_id = %req_id, slug = %slug, receiver = %format!("{receiver:#x}"), "Minting one unit");
    let pending = state.notifier.pending("Minting...");

    let outcome = state.contract.claim_to(contract, receiver, U256::one()).await;

    // Both outcomes drop the indeterminate notification.
    state.notifier.dismiss(pending);

    match outcome {
        Ok(outcome) => {
            let tx_hash = format!("{:#x}", outcome.tx_hash);
            info!(slug = %slug, tx_hash = %tx_hash, "Mint succeeded");
            state
                .notifier
                .success("HOORAY... You successfully minted an NFT!");

            // Re-read the counters so the response carries the post-claim
            // supply instead of a stale count.
            let refreshed = match state.contract.supply(contract).await {
                Ok(supply) => Some((supply.claimed.to_string(), supply.total.to_string())),
                Err(e) => {
                    warn!(slug = %slug, error = %e, "Post-mint supply refresh failed");
                    None
                }
            };

            (StatusCode::OK, Json(MintResponse::ok(tx_hash, refreshed)))
        }
        Err(e) => {
            error!(slug = %slug, error = %e, "Mint failed");
            state.notifier.error(e.user_message());

            let status = match &e {
                MintError::Rejected => StatusCode::BAD_REQUEST,
                MintError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
                MintError::Reverted(_) => StatusCode::CONFLICT,
                MintError::Network(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(MintResponse::err(e.to_string())))
        }
    }
}

/// Toggle the wallet session: disconnect when connected, connect otherwise.
/// `POST /wallet`
pub async fn toggle_wallet<C, D, W>(
    State(state): State<Arc<AppState<C, D, W>>>,
) -> (StatusCode, Json<WalletResponse>)
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    state.request_count.fetch_add(1, Ordering::Relaxed);

    if state.wallet.address().is_some() {
        state.wallet.disconnect();
        return (
            StatusCode::OK,
            Json(WalletResponse {
                connected: false,
                address: None,
                error: None,
            }),
        );
    }

    match state.wallet.connect().await {
        Ok(address) => (
            StatusCode::OK,
            Json(WalletResponse {
                connected: true,
                address: Some(to_checksum(&address, None)),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Wallet connection failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(WalletResponse {
                    connected: false,
                    address: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Active transient notifications. `GET /notifications`
pub async fn notifications<C, D, W>(
    State(state): State<Arc<AppState<C, D, W>>>,
) -> impl IntoResponse
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    Json(state.notifier.active())
}

/// Health check with chain connectivity. `GET /health`
pub async fn health<C, D, W>(State(state): State<Arc<AppState<C, D, W>>>) -> impl IntoResponse
where
    C: ContentStore + 'static,
    D: DropContract + 'static,
    W: Wallet + 'static,
{
    let chain = state.contract.health().await;

    Json(HealthResponse {
        status: chain.status,
        marketplace: state.config.marketplace_name.clone(),
        rpc_status: chain.status,
        active_rpc: chain.active_rpc,
        failovers: chain.failovers,
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
    })
}
