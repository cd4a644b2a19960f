//! Ethereum JSON-RPC client with automatic failover.
//!
//! Wraps two HTTP endpoints with primary → fallback failover and a circuit
//! breaker. Transport failures fail over; error objects returned by a node
//! do not (the node answered, re-asking another node would re-execute).

use crate::error::Error;
use ethers_core::types::{Address, H256};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

/// Consecutive failures before the circuit breaker opens.
const CIRCUIT_BREAKER_THRESHOLD: u64 = 5;
/// How long (ms) before a tripped breaker retries the primary.
const CIRCUIT_BREAKER_WINDOW_MS: u64 = 30_000;

struct CircuitState {
    failures: u64,
    last_failure_ms: u64,
    open: bool,
}

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client with primary → fallback failover.
pub struct RpcClient {
    http: reqwest::Client,
    primary_url: String,
    fallback_url: String,
    circuit: Mutex<CircuitState>,
    total_failovers: AtomicU64,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(primary_url: &str, fallback_url: &str) -> Self {
        info!(
            primary = primary_url,
            fallback = fallback_url,
            "RPC client initialized with failover"
        );
        Self {
            http: reqwest::Client::new(),
            primary_url: primary_url.to_string(),
            fallback_url: fallback_url.to_string(),
            circuit: Mutex::new(CircuitState {
                failures: 0,
                last_failure_ms: 0,
                open: false,
            }),
            total_failovers: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// Issue a JSON-RPC call with failover on transport errors.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, Error> {
        let outcome = match self.request(self.active_url(), method, &params).await {
            Ok(outcome) => {
                self.record_success();
                outcome
            }
            Err(e) => {
                self.record_failure();
                warn!(method, error = %e, "Primary RPC request failed, trying fallback");
                self.request(&self.fallback_url, method, &params)
                    .await
                    .map_err(|e2| {
                        Error::Rpc(format!(
                            "{method} failed on both endpoints: primary={e}, fallback={e2}"
                        ))
                    })?
            }
        };

        outcome.map_err(|err| Error::Rpc(format!("{} (code {})", err.message, err.code)))
    }

    /// One request against one endpoint. `Err` is transport-level (failover
    /// candidate); `Ok(Err)` is a node-level error object.
    async fn request(
        &self,
        url: &str,
        method: &str,
        params: &Value,
    ) -> Result<Result<Value, RpcErrorObject>, reqwest::Error> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let envelope: RpcEnvelope = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(match envelope.error {
            Some(err) => Err(err),
            None => Ok(envelope.result.unwrap_or(Value::Null)),
        })
    }

    // --- Typed methods ---

    /// `eth_call` against a contract at the latest block.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, Error> {
        let params = json!([
            { "to": format!("{to:#x}"), "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let result = self.call("eth_call", params).await?;
        hex_bytes(&result)
    }

    /// Accounts managed by the wallet-holding node.
    pub async fn eth_accounts(&self) -> Result<Vec<Address>, Error> {
        let result = self.call("eth_accounts", json!([])).await?;
        let entries = result
            .as_array()
            .ok_or_else(|| Error::Rpc("eth_accounts returned a non-array".into()))?;
        entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .unwrap_or_default()
                    .parse::<Address>()
                    .map_err(|e| Error::Rpc(format!("invalid account address: {e}")))
            })
            .collect()
    }

    /// Submit a transaction for the node to sign and broadcast.
    pub async fn send_transaction(&self, tx: Value) -> Result<H256, Error> {
        let result = self.call("eth_sendTransaction", json!([tx])).await?;
        hex_h256(&result)
    }

    /// Receipt for a mined transaction, `None` while still pending.
    pub async fn transaction_receipt(&self, tx_hash: H256) -> Result<Option<Value>, Error> {
        let params = json!([format!("{tx_hash:#x}")]);
        let result = self.call("eth_getTransactionReceipt", params).await?;
        if result.is_null() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }

    /// Quick connectivity check. Returns "ok", "degraded", or error.
    pub async fn health_check(&self) -> Result<&'static str, Error> {
        let probe = json!([]);
        match self.request(&self.primary_url, "eth_blockNumber", &probe).await {
            Ok(_) => Ok("ok"),
            Err(_) => match self.request(&self.fallback_url, "eth_blockNumber", &probe).await {
                Ok(_) => Ok("degraded"),
                Err(e) => Err(Error::Rpc(format!("both RPC endpoints unreachable: {e}"))),
            },
        }
    }

    // --- Failover / circuit breaker ---

    /// Record a successful call — resets the circuit.
    fn record_success(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if circuit.failures > 0 {
            info!(primary = %self.primary_url, "Primary RPC recovered");
            circuit.failures = 0;
            circuit.open = false;
        }
    }

    /// Record a failed call — may open the circuit.
    fn record_failure(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        circuit.failures += 1;
        circuit.last_failure_ms = now_ms();
        if circuit.failures >= CIRCUIT_BREAKER_THRESHOLD && !circuit.open {
            circuit.open = true;
            self.total_failovers.fetch_add(1, Ordering::Relaxed);
            warn!(
                failures = circuit.failures,
                fallback = %self.fallback_url,
                "Circuit breaker opened — routing to fallback"
            );
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if !circuit.open {
            return false;
        }
        // Half-open: retry primary after the window
        if now_ms() - circuit.last_failure_ms > CIRCUIT_BREAKER_WINDOW_MS {
            circuit.open = false;
            circuit.failures = 0;
            info!(primary = %self.primary_url, "Circuit breaker half-open, retrying primary");
            return false;
        }
        true
    }

    /// Total number of failover events (for the health endpoint).
    pub fn failover_count(&self) -> u64 {
        self.total_failovers.load(Ordering::Relaxed)
    }

    /// Which URL is currently active.
    pub fn active_url(&self) -> &str {
        if self.is_circuit_open() {
            &self.fallback_url
        } else {
            &self.primary_url
        }
    }
}

/// Decode a JSON-RPC hex string result into raw bytes.
fn hex_bytes(value: &Value) -> Result<Vec<u8>, Error> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::Rpc("expected a hex string result".into()))?;
    hex::decode(text.trim_start_matches("0x"))
        .map_err(|e| Error::Rpc(format!("invalid hex result: {e}")))
}

/// Decode a JSON-RPC hex string result into a 32-byte hash.
fn hex_h256(value: &Value) -> Result<H256, Error> {
    let bytes = hex_bytes(value)?;
    if bytes.len() != 32 {
        return Err(Error::Rpc(format!(
            "expected a 32-byte hash, got {} bytes",
            bytes.len()
        )));
    }
    Ok(H256::from_slice(&bytes))
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes_accepts_prefixed_and_bare() {
        let v = Value::String("0x0102ff".into());
        assert_eq!(hex_bytes(&v).unwrap(), vec![0x01, 0x02, 0xff]);
        let v = Value::String("0102ff".into());
        assert_eq!(hex_bytes(&v).unwrap(), vec![0x01, 0x02, 0xff]);
    }

    #[test]
    fn test_hex_h256_rejects_short_values() {
        let v = Value::String("0x01".into());
        assert!(hex_h256(&v).is_err());
    }

    #[test]
    fn test_circuit_opens_after_threshold() {
        let rpc = RpcClient::new("http://primary.invalid", "http://fallback.invalid");
        for _ in 0..CIRCUIT_BREAKER_THRESHOLD {
            rpc.record_failure();
        }
        assert!(rpc.is_circuit_open());
        assert_eq!(rpc.active_url(), "http://fallback.invalid");
        assert_eq!(rpc.failover_count(), 1);

        rpc.record_success();
        assert!(!rpc.is_circuit_open());
        assert_eq!(rpc.active_url(), "http://primary.invalid");
    }
}
