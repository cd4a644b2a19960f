//! Page load state and render policy.
//!
//! Each data source gets a tagged load state instead of a bag of optional
//! flags, and every transition goes through one reducer. The two reads
//! (supply, price) are independent: the page must render with any subset of
//! them resolved.

use crate::contract::Supply;
use ethers_core::types::Address;

/// Load state of one remote data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remote<T> {
    NotStarted,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Remote::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Resolved one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(self, Remote::Loaded(_) | Remote::Failed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Remote::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Client-side state of one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub supply: Remote<Supply>,
    /// Display price in ETH.
    pub price: Remote<String>,
    pub minting: bool,
}

/// Everything that can happen to a page view.
#[derive(Debug, Clone)]
pub enum PageEvent {
    SupplyRequested,
    SupplyLoaded(Supply),
    SupplyFailed(String),
    PriceRequested,
    PriceLoaded(String),
    PriceFailed(String),
    MintStarted,
    MintSettled,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            supply: Remote::NotStarted,
            price: Remote::NotStarted,
            minting: false,
        }
    }

    /// The reducer. Supply and price events never touch each other's state.
    pub fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::SupplyRequested => self.supply = Remote::Loading,
            PageEvent::SupplyLoaded(supply) => self.supply = Remote::Loaded(supply),
            PageEvent::SupplyFailed(reason) => self.supply = Remote::Failed(reason),
            PageEvent::PriceRequested => self.price = Remote::Loading,
            PageEvent::PriceLoaded(price) => self.price = Remote::Loaded(price),
            PageEvent::PriceFailed(reason) => self.price = Remote::Failed(reason),
            PageEvent::MintStarted => self.minting = true,
            PageEvent::MintSettled => self.minting = false,
        }
    }

    /// True until both reads settle, and again while a mint is in flight.
    pub fn loading(&self) -> bool {
        self.minting || !self.supply.is_settled() || !self.price.is_settled()
    }

    pub fn sold_out(&self) -> bool {
        match self.supply.loaded() {
            Some(supply) => supply.claimed >= supply.total,
            None => false,
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mint button rendering, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintButton {
    Loading,
    SoldOut,
    SignIn,
    Mint { price: Option<String> },
}

impl MintButton {
    pub fn label(&self) -> String {
        match self {
            MintButton::Loading => "Loading".to_string(),
            MintButton::SoldOut => "Sold Out!".to_string(),
            MintButton::SignIn => "Sign in to Mint".to_string(),
            MintButton::Mint { price: Some(price) } => format!("Mint NFT ({price} ETH)"),
            MintButton::Mint { price: None } => "Mint NFT".to_string(),
        }
    }

    /// Enabled iff none of loading / sold out / signed out hold.
    pub fn enabled(&self) -> bool {
        matches!(self, MintButton::Mint { .. })
    }
}

/// Button state for the current page: loading beats sold-out beats sign-in
/// beats the price-labeled action.
pub fn mint_button(state: &PageState, address: Option<Address>) -> MintButton {
    if state.loading() {
        MintButton::Loading
    } else if state.sold_out() {
        MintButton::SoldOut
    } else if address.is_none() {
        MintButton::SignIn
    } else {
        MintButton::Mint {
            price: state.price.loaded().cloned(),
        }
    }
}

/// First four and last four characters of the displayed address form.
pub fn short_address(address: &str) -> String {
    if address.len() <= 8 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..4],
        &address[address.len() - 4..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;

    fn supply(claimed: u64, total: u64) -> Supply {
        Supply {
            claimed: U256::from(claimed),
            total: U256::from(total),
        }
    }

    fn settled_state(claimed: u64, total: u64) -> PageState {
        let mut state = PageState::new();
        state.apply(PageEvent::SupplyRequested);
        state.apply(PageEvent::PriceRequested);
        state.apply(PageEvent::SupplyLoaded(supply(claimed, total)));
        state.apply(PageEvent::PriceLoaded("0.01".to_string()));
        state
    }

    fn some_address() -> Address {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
    }

    #[test]
    fn test_loading_until_both_reads_settle() {
        let mut state = PageState::new();
        state.apply(PageEvent::SupplyRequested);
        state.apply(PageEvent::PriceRequested);
        assert!(state.loading());

        state.apply(PageEvent::SupplyLoaded(supply(7, 25)));
        assert!(state.loading());

        state.apply(PageEvent::PriceLoaded("0.01".to_string()));
        assert!(!state.loading());
    }

    #[test]
    fn test_failure_counts_as_settled() {
        let mut state = PageState::new();
        state.apply(PageEvent::SupplyLoaded(supply(7, 25)));
        state.apply(PageEvent::PriceFailed("rpc error".to_string()));
        assert!(!state.loading());
    }

    #[test]
    fn test_reads_are_independent() {
        let mut state = PageState::new();
        state.apply(PageEvent::PriceFailed("rpc error".to_string()));
        state.apply(PageEvent::SupplyLoaded(supply(7, 25)));

        // The failed price read does not suppress the supply data.
        assert_eq!(state.supply.loaded(), Some(&supply(7, 25)));
        assert_eq!(state.price.failure(), Some("rpc error"));
    }

    #[test]
    fn test_mint_toggles_loading() {
        let mut state = settled_state(7, 25);
        assert!(!state.loading());
        state.apply(PageEvent::MintStarted);
        assert!(state.loading());
        state.apply(PageEvent::MintSettled);
        assert!(!state.loading());
    }

    #[test]
    fn test_button_priority_loading_first() {
        let state = PageState::new();
        let button = mint_button(&state, Some(some_address()));
        assert_eq!(button, MintButton::Loading);
        assert!(!button.enabled());
    }

    #[test]
    fn test_button_loading_beats_sold_out() {
        let mut state = settled_state(25, 25);
        state.apply(PageEvent::MintStarted);
        assert_eq!(mint_button(&state, Some(some_address())), MintButton::Loading);
    }

    #[test]
    fn test_button_sold_out_beats_sign_in() {
        let state = settled_state(25, 25);
        // Even signed out, a sold-out drop reads "Sold Out!".
        assert_eq!(mint_button(&state, None), MintButton::SoldOut);
    }

    #[test]
    fn test_button_sign_in_when_disconnected() {
        let state = settled_state(7, 25);
        let button = mint_button(&state, None);
        assert_eq!(button, MintButton::SignIn);
        assert!(!button.enabled());
    }

    #[test]
    fn test_button_enabled_only_when_mintable() {
        let state = settled_state(7, 25);
        let button = mint_button(&state, Some(some_address()));
        assert_eq!(
            button,
            MintButton::Mint {
                price: Some("0.01".to_string())
            }
        );
        assert!(button.enabled());
        assert_eq!(button.label(), "Mint NFT (0.01 ETH)");
    }

    #[test]
    fn test_button_mintable_without_price() {
        let mut state = settled_state(7, 25);
        state.price = Remote::Failed("rpc error".to_string());
        let button = mint_button(&state, Some(some_address()));
        assert_eq!(button, MintButton::Mint { price: None });
        assert!(button.enabled());
        assert_eq!(button.label(), "Mint NFT");
    }

    #[test]
    fn test_short_address_truncation() {
        assert_eq!(
            short_address("0xABCDEF1234567890abcdef"),
            "0xAB...cdef"
        );
        // Case is preserved, not normalized.
        assert_eq!(short_address("0xabcdef1234567890ABCDEF"), "0xab...CDEF");
    }

    #[test]
    fn test_short_address_leaves_short_strings_alone() {
        assert_eq!(short_address("0xabcd"), "0xabcd");
    }
}
