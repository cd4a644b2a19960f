//! Drop page configuration.

use serde::Deserialize;

/// Configuration for the drop page service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::content_api_url")]
    pub content_api_url: String,

    #[serde(default = "defaults::content_dataset")]
    pub content_dataset: String,

    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    #[serde(default = "defaults::marketplace_name")]
    pub marketplace_name: String,

    #[serde(default = "defaults::notification_ttl_secs")]
    pub notification_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_api_url: defaults::content_api_url(),
            content_dataset: defaults::content_dataset(),
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            bind_address: defaults::bind_address(),
            marketplace_name: defaults::marketplace_name(),
            notification_ttl_secs: defaults::notification_ttl_secs(),
        }
    }
}

mod defaults {
    fn network() -> String {
        std::env::var("DROP_PAGE_NETWORK")
            .or_else(|_| std::env::var("ETH_NETWORK"))
            .unwrap_or_else(|_| "sepolia".into())
    }

    pub fn content_api_url() -> String {
        if let Ok(url) = std::env::var("DROP_PAGE_CONTENT_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        "https://demo.api.sanity.io".into()
    }

    pub fn content_dataset() -> String {
        "production".into()
    }

    pub fn rpc_url() -> String {
        if let Ok(url) = std::env::var("DROP_PAGE_RPC_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if network().contains("mainnet") {
            "https://ethereum-rpc.publicnode.com".into()
        } else {
            "https://ethereum-sepolia-rpc.publicnode.com".into()
        }
    }

    pub fn fallback_rpc_url() -> String {
        if network().contains("mainnet") {
            "https://eth.llamarpc.com".into()
        } else {
            "https://rpc.sepolia.org".into()
        }
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }

    pub fn marketplace_name() -> String {
        "Sample NFT".into()
    }

    pub fn notification_ttl_secs() -> u64 {
        8
    }
}
