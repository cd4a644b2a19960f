//! Response types for the JSON endpoints.

use serde::Serialize;

/// Response from the mint endpoint.
#[derive(Serialize)]
pub struct MintResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Supply counters re-read after a successful claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MintResponse {
    pub fn ok(tx_hash: String, supply: Option<(String, String)>) -> Self {
        let (claimed, total) = match supply {
            Some((claimed, total)) => (Some(claimed), Some(total)),
            None => (None, None),
        };
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            claimed,
            total,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            claimed: None,
            total: None,
            error: Some(error.into()),
        }
    }
}

/// Response from the wallet toggle endpoint.
#[derive(Serialize)]
pub struct WalletResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub marketplace: String,
    pub rpc_status: &'static str,
    pub active_rpc: String,
    pub failovers: u64,
    pub uptime_secs: u64,
    pub requests: u64,
}
