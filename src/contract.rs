//! Drop contract client.
//!
//! Read side: claimed/total supply and the active claim condition. Write
//! side: submit a claim for the connected address through the wallet-holding
//! node and wait for the receipt. Calldata is built by hand from function
//! selectors and 32-byte words; the drop contracts involved only take
//! address and uint arguments.

use crate::error::{Error, MintError};
use crate::rpc::RpcClient;
use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Address, H256, U256};
use ethers_core::utils::{format_ether, keccak256};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How often to poll for a claim receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Poll attempts before the claim is reported as unconfirmed.
const RECEIPT_POLL_ATTEMPTS: u32 = 30;

/// Claimed and total supply of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supply {
    pub claimed: U256,
    pub total: U256,
}

/// One claim phase of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimCondition {
    pub start_timestamp: U256,
    pub max_claimable_supply: U256,
    pub supply_claimed: U256,
    pub quantity_limit_per_wallet: U256,
    /// Unit price in wei.
    pub price_wei: U256,
}

impl ClaimCondition {
    /// Display price in ETH, without trailing zeros.
    pub fn price_in_eth(&self) -> String {
        let text = format_ether(self.price_wei);
        match text.trim_end_matches('0').trim_end_matches('.') {
            "" => "0".to_string(),
            trimmed => trimmed.to_string(),
        }
    }
}

/// Result of a submitted claim transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
}

/// Chain connectivity summary for the health endpoint.
#[derive(Debug, Clone)]
pub struct ChainHealth {
    pub status: &'static str,
    pub active_rpc: String,
    pub failovers: u64,
}

/// Capability handle for the deployed drop contract.
pub trait DropContract: Send + Sync {
    /// Claimed and total supply. One logical read; the view must render
    /// correctly whether or not it ever resolves.
    fn supply(&self, contract: Address) -> impl Future<Output = Result<Supply, Error>> + Send;

    /// Claim conditions, most recent phase first. The first entry carries
    /// the display price.
    fn claim_conditions(
        &self,
        contract: Address,
    ) -> impl Future<Output = Result<Vec<ClaimCondition>, Error>> + Send;

    /// Claim `quantity` units to `receiver` and wait for the outcome.
    fn claim_to(
        &self,
        contract: Address,
        receiver: Address,
        quantity: U256,
    ) -> impl Future<Output = Result<TxOutcome, MintError>> + Send;

    /// Connectivity probe for the health endpoint.
    fn health(&self) -> impl Future<Output = ChainHealth> + Send;
}

/// Drop contract client over Ethereum JSON-RPC.
pub struct EthDropContract {
    rpc: Arc<RpcClient>,
}

impl EthDropContract {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    /// Call a no-argument view returning a single uint256.
    async fn read_uint(&self, contract: Address, signature: &str) -> Result<U256, Error> {
        let bytes = self.rpc.eth_call(contract, &selector(signature)).await?;
        decode_uints(&bytes, 1).map(|words| words[0])
    }
}

impl DropContract for EthDropContract {
    async fn supply(&self, contract: Address) -> Result<Supply, Error> {
        let claimed = self.read_uint(contract, "totalClaimedSupply()").await?;
        let total = self.read_uint(contract, "nextTokenIdToMint()").await?;
        Ok(Supply { claimed, total })
    }

    async fn claim_conditions(&self, contract: Address) -> Result<Vec<ClaimCondition>, Error> {
        let bytes = self
            .rpc
            .eth_call(contract, &selector("claimCondition()"))
            .await?;
        let words = decode_uints(&bytes, 5)?;
        Ok(vec![ClaimCondition {
            start_timestamp: words[0],
            max_claimable_supply: words[1],
            supply_claimed: words[2],
            quantity_limit_per_wallet: words[3],
            price_wei: words[4],
        }])
    }

    async fn claim_to(
        &self,
        contract: Address,
        receiver: Address,
        quantity: U256,
    ) -> Result<TxOutcome, MintError> {
        let conditions = self
            .claim_conditions(contract)
            .await
            .map_err(|e| MintError::Network(e.to_string()))?;
        let price = conditions
            .first()
            .map(|c| c.price_wei)
            .unwrap_or_default();
        let value = price.saturating_mul(quantity);

        let data = claim_calldata(receiver, quantity);
        let tx = json!({
            "from": format!("{receiver:#x}"),
            "to": format!("{contract:#x}"),
            "value": format!("{value:#x}"),
            "data": format!("0x{}", hex::encode(data)),
        });

        let tx_hash = self
            .rpc
            .send_transaction(tx)
            .await
            .map_err(|e| MintError::classify(&e.to_string()))?;
        info!(tx_hash = %format!("{tx_hash:#x}"), "Claim submitted, awaiting receipt");

        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            if let Some(receipt) = self
                .rpc
                .transaction_receipt(tx_hash)
                .await
                .map_err(|e| MintError::Network(e.to_string()))?
            {
                let (succeeded, block_number) = receipt_outcome(&receipt);
                if succeeded {
                    return Ok(TxOutcome {
                        tx_hash,
                        block_number,
                    });
                }
                return Err(MintError::Reverted(format!(
                    "claim transaction {tx_hash:#x} reverted on-chain"
                )));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }

        warn!(tx_hash = %format!("{tx_hash:#x}"), "No receipt within polling deadline");
        Err(MintError::Network(format!(
            "transaction {tx_hash:#x} not confirmed within the polling deadline"
        )))
    }

    async fn health(&self) -> ChainHealth {
        ChainHealth {
            status: self.rpc.health_check().await.unwrap_or("unavailable"),
            active_rpc: self.rpc.active_url().to_string(),
            failovers: self.rpc.failover_count(),
        }
    }
}

/// First four bytes of the keccak-256 of a function signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `claim(address,uint256)`.
fn claim_calldata(receiver: Address, quantity: U256) -> Vec<u8> {
    let mut data = selector("claim(address,uint256)").to_vec();
    data.extend(encode(&[Token::Address(receiver), Token::Uint(quantity)]));
    data
}

/// Decode `count` consecutive uint256 words from a call result.
fn decode_uints(bytes: &[u8], count: usize) -> Result<Vec<U256>, Error> {
    let types = vec![ParamType::Uint(256); count];
    let tokens = decode(&types, bytes)
        .map_err(|e| Error::Rpc(format!("malformed call result: {e}")))?;
    tokens
        .into_iter()
        .map(|token| {
            token
                .into_uint()
                .ok_or_else(|| Error::Rpc("expected a uint word".into()))
        })
        .collect()
}

/// Success flag and block number from a receipt.
fn receipt_outcome(receipt: &Value) -> (bool, Option<u64>) {
    let succeeded = receipt
        .get("status")
        .and_then(|s| s.as_str())
        .map(|s| s == "0x1")
        .unwrap_or(false);
    let block_number = receipt
        .get("blockNumber")
        .and_then(|b| b.as_str())
        .and_then(|b| u64::from_str_radix(b.trim_start_matches("0x"), 16).ok());
    (succeeded, block_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches_known_values() {
        // Well-known ERC-20/721 selectors.
        assert_eq!(selector("totalSupply()"), [0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_claim_calldata_layout() {
        let receiver: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse()
            .unwrap();
        let data = claim_calldata(receiver, U256::one());

        // selector + two 32-byte words
        assert_eq!(data.len(), 4 + 64);
        // address is right-aligned in its word
        assert_eq!(&data[4 + 12..4 + 32], receiver.as_bytes());
        // quantity word
        assert_eq!(data[4 + 63], 1);
    }

    #[test]
    fn test_decode_uints_round_trips_words() {
        let encoded = encode(&[Token::Uint(U256::from(7u64)), Token::Uint(U256::from(25u64))]);
        let words = decode_uints(&encoded, 2).unwrap();
        assert_eq!(words, vec![U256::from(7u64), U256::from(25u64)]);
    }

    #[test]
    fn test_decode_uints_rejects_truncated_input() {
        assert!(decode_uints(&[0u8; 16], 1).is_err());
    }

    #[test]
    fn test_receipt_outcome() {
        let mined = json!({ "status": "0x1", "blockNumber": "0x10" });
        assert_eq!(receipt_outcome(&mined), (true, Some(16)));

        let reverted = json!({ "status": "0x0", "blockNumber": "0x10" });
        assert_eq!(receipt_outcome(&reverted), (false, Some(16)));

        let malformed = json!({});
        assert_eq!(receipt_outcome(&malformed), (false, None));
    }

    #[test]
    fn test_price_in_eth_trims_trailing_zeros() {
        let condition = ClaimCondition {
            start_timestamp: U256::zero(),
            max_claimable_supply: U256::from(25u64),
            supply_claimed: U256::from(7u64),
            quantity_limit_per_wallet: U256::one(),
            price_wei: U256::from(10_000_000_000_000_000u64), // 0.01 ETH
        };
        assert_eq!(condition.price_in_eth(), "0.01");

        let free = ClaimCondition {
            price_wei: U256::zero(),
            ..condition
        };
        assert_eq!(free.price_in_eth(), "0");
    }
}
