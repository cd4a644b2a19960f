//! Application state shared across handlers.

use crate::config::Config;
use crate::content::{ContentStore, HttpContentStore};
use crate::contract::{DropContract, EthDropContract};
use crate::notify::Notifier;
use crate::rpc::RpcClient;
use crate::wallet::{NodeWallet, Wallet};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state. The content store, drop contract, and wallet
/// are explicit capability handles so tests can substitute doubles.
pub struct AppState<C, D, W> {
    pub config: Config,
    pub content: C,
    pub contract: D,
    pub wallet: W,
    pub notifier: Notifier,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl<C, D, W> AppState<C, D, W>
where
    C: ContentStore,
    D: DropContract,
    W: Wallet,
{
    /// Assemble state from explicit handles.
    pub fn with_handles(config: Config, content: C, contract: D, wallet: W) -> Self {
        let notifier = Notifier::new(Duration::from_secs(config.notification_ttl_secs));
        Self {
            config,
            content,
            contract,
            wallet,
            notifier,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }
}

impl AppState<HttpContentStore, EthDropContract, NodeWallet> {
    /// Production wiring: HTTP content store plus contract client and
    /// wallet session sharing one failover RPC client.
    pub fn from_config(config: Config) -> Self {
        let rpc = Arc::new(RpcClient::new(&config.rpc_url, &config.fallback_rpc_url));
        let content = HttpContentStore::new(&config.content_api_url, &config.content_dataset);
        let contract = EthDropContract::new(Arc::clone(&rpc));
        let wallet = NodeWallet::new(rpc);
        Self::with_handles(config, content, contract, wallet)
    }
}
