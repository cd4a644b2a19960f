//! Test doubles for the page's capability handles.

use drop_page::content::{Collection, ContentStore, Creator};
use drop_page::contract::{ChainHealth, ClaimCondition, DropContract, Supply, TxOutcome};
use drop_page::wallet::Wallet;
use drop_page::{Error, MintError};
use ethers_core::types::{Address, H256, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const WALLET_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const CONTRACT_ADDRESS: &str = "0x322813Fd9A801c5507c9de605d63CEA4f2CE6c44";

pub fn sample_collection(slug: &str) -> Collection {
    Collection {
        id: format!("col-{slug}"),
        title: "Sample Apes".to_string(),
        description: "A collection of sample apes.".to_string(),
        nft_collection_name: "Sample Ape Club".to_string(),
        address: CONTRACT_ADDRESS.to_string(),
        slug: slug.to_string(),
        main_image: "https://cdn.example/main.png".to_string(),
        preview_image: "https://cdn.example/preview.png".to_string(),
        creator: Creator {
            id: "creator-1".to_string(),
            name: "Sonny".to_string(),
            address: WALLET_ADDRESS.to_string(),
            slug: "sonny".to_string(),
        },
    }
}

// --- Content ---

#[derive(Clone, Default)]
pub struct FakeContent {
    collections: HashMap<String, Collection>,
}

impl FakeContent {
    pub fn with_collection(slug: &str) -> Self {
        let mut collections = HashMap::new();
        collections.insert(slug.to_string(), sample_collection(slug));
        Self { collections }
    }
}

impl ContentStore for FakeContent {
    async fn collection(&self, slug: &str) -> Result<Option<Collection>, Error> {
        Ok(self.collections.get(slug).cloned())
    }
}

// --- Contract ---

struct ContractInner {
    supply: Mutex<Supply>,
    price_wei: U256,
    supply_fails: AtomicBool,
    price_fails: AtomicBool,
    claim_error: Mutex<Option<MintError>>,
    claims: AtomicU64,
}

#[derive(Clone)]
pub struct FakeContract {
    inner: Arc<ContractInner>,
}

impl FakeContract {
    pub fn new(claimed: u64, total: u64) -> Self {
        Self {
            inner: Arc::new(ContractInner {
                supply: Mutex::new(Supply {
                    claimed: U256::from(claimed),
                    total: U256::from(total),
                }),
                price_wei: U256::from(10_000_000_000_000_000u64), // 0.01 ETH
                supply_fails: AtomicBool::new(false),
                price_fails: AtomicBool::new(false),
                claim_error: Mutex::new(None),
                claims: AtomicU64::new(0),
            }),
        }
    }

    pub fn fail_supply_reads(&self) {
        self.inner.supply_fails.store(true, Ordering::Relaxed);
    }

    pub fn fail_price_reads(&self) {
        self.inner.price_fails.store(true, Ordering::Relaxed);
    }

    pub fn fail_claims_with(&self, error: MintError) {
        *self.inner.claim_error.lock().unwrap() = Some(error);
    }

    pub fn claim_count(&self) -> u64 {
        self.inner.claims.load(Ordering::Relaxed)
    }
}

impl DropContract for FakeContract {
    async fn supply(&self, _contract: Address) -> Result<Supply, Error> {
        if self.inner.supply_fails.load(Ordering::Relaxed) {
            return Err(Error::Rpc("supply read failed".into()));
        }
        Ok(*self.inner.supply.lock().unwrap())
    }

    async fn claim_conditions(&self, _contract: Address) -> Result<Vec<ClaimCondition>, Error> {
        if self.inner.price_fails.load(Ordering::Relaxed) {
            return Err(Error::Rpc("price read failed".into()));
        }
        let supply = *self.inner.supply.lock().unwrap();
        Ok(vec![ClaimCondition {
            start_timestamp: U256::zero(),
            max_claimable_supply: supply.total,
            supply_claimed: supply.claimed,
            quantity_limit_per_wallet: U256::one(),
            price_wei: self.inner.price_wei,
        }])
    }

    async fn claim_to(
        &self,
        _contract: Address,
        _receiver: Address,
        quantity: U256,
    ) -> Result<TxOutcome, MintError> {
        self.inner.claims.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self.inner.claim_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut supply = self.inner.supply.lock().unwrap();
        supply.claimed = supply.claimed + quantity;
        Ok(TxOutcome {
            tx_hash: H256::repeat_byte(0xab),
            block_number: Some(1),
        })
    }

    async fn health(&self) -> ChainHealth {
        ChainHealth {
            status: "ok",
            active_rpc: "http://fake-rpc.test".to_string(),
            failovers: 0,
        }
    }
}

// --- Wallet ---

#[derive(Default)]
struct WalletInner {
    address: Mutex<Option<Address>>,
    connects: AtomicU64,
    disconnects: AtomicU64,
}

#[derive(Clone, Default)]
pub struct FakeWallet {
    inner: Arc<WalletInner>,
}

impl FakeWallet {
    pub fn connected() -> Self {
        let wallet = Self::default();
        *wallet.inner.address.lock().unwrap() = Some(WALLET_ADDRESS.parse().unwrap());
        wallet
    }

    pub fn connect_count(&self) -> u64 {
        self.inner.connects.load(Ordering::Relaxed)
    }

    pub fn disconnect_count(&self) -> u64 {
        self.inner.disconnects.load(Ordering::Relaxed)
    }
}

impl Wallet for FakeWallet {
    fn address(&self) -> Option<Address> {
        *self.inner.address.lock().unwrap()
    }

    async fn connect(&self) -> Result<Address, Error> {
        self.inner.connects.fetch_add(1, Ordering::Relaxed);
        let address: Address = WALLET_ADDRESS.parse().unwrap();
        *self.inner.address.lock().unwrap() = Some(address);
        Ok(address)
    }

    fn disconnect(&self) {
        self.inner.disconnects.fetch_add(1, Ordering::Relaxed);
        self.inner.address.lock().unwrap().take();
    }
}
