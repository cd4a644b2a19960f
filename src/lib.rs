//! # Drop Page
//!
//! A server-rendered mint page for NFT drops. Looks up collection metadata
//! in an external content store, reads claim state from the deployed drop
//! contract, and submits claim transactions through the wallet-holding node.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin drop-page
//! ```
//!
//! ## Endpoints
//! - `GET /drop/{slug}` - The rendered drop page
//! - `POST /drop/{slug}/mint` - Claim one unit to the connected wallet
//! - `POST /wallet` - Toggle the wallet session
//! - `GET /notifications` - Active transient notifications
//! - `GET /health` - Health check

pub mod config;
pub mod content;
pub mod contract;
mod error;
mod handlers;
mod middleware;
pub mod notify;
pub mod page;
mod response;
mod router;
pub mod rpc;
mod state;
mod view;
pub mod wallet;

pub use config::Config;
pub use error::{Error, MintError};
pub use router::create as create_router;
pub use state::AppState;
