//! Wallet session handling.
//!
//! The wallet itself (keys, signing) is owned by the wallet-holding node;
//! the page only observes the current address and asks to connect or
//! disconnect. The session lives in memory for the lifetime of the service.

use crate::error::Error;
use crate::rpc::RpcClient;
use ethers_core::types::Address;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Capability handle for the wallet provider.
pub trait Wallet: Send + Sync {
    /// Currently connected address, `None` when disconnected.
    fn address(&self) -> Option<Address>;

    /// Request a wallet connection.
    fn connect(&self) -> impl Future<Output = Result<Address, Error>> + Send;

    /// Drop the current session.
    fn disconnect(&self);
}

/// Wallet session backed by the node's managed accounts.
pub struct NodeWallet {
    rpc: Arc<RpcClient>,
    session: RwLock<Option<Address>>,
}

impl NodeWallet {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self {
            rpc,
            session: RwLock::new(None),
        }
    }
}

impl Wallet for NodeWallet {
    fn address(&self) -> Option<Address> {
        *self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    async fn connect(&self) -> Result<Address, Error> {
        let accounts = self.rpc.eth_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| Error::Rpc("wallet node manages no accounts".into()))?;

        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(address);
        info!(address = %format!("{address:#x}"), "Wallet connected");
        Ok(address)
    }

    fn disconnect(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(address) = previous {
            info!(address = %format!("{address:#x}"), "Wallet disconnected");
        }
    }
}
