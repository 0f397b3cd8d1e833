//! Venue adapter for the perp gateway.
//!
//! Wraps the venue's REST surface: read-only info queries (balances, open
//! trades, pair details), signed exchange actions (open/close position,
//! withdraw, agent approval, faucet), key handling, and the agent wallet
//! pool lookup. Raw venue payloads are normalized at this boundary; handlers
//! above only see the canonical types from `gateway-core`.

pub mod client;
pub mod error;
pub mod exchange;
pub mod signer;
#[cfg(feature = "testkit")]
pub mod testkit;
pub mod types;
pub mod wallet_pool;

pub use client::VenueInfoClient;
pub use error::{VenueError, VenueResult};
pub use exchange::{VenueApi, VenueClient};
pub use signer::{parse_address, ActionSigner, SignerCache, WireSignature};
pub use types::{
    CloseReceipt, FaucetReceipt, OpenPositionParams, OrderReceipt, RawAmount, RawOpenTrade,
    TransferParams, TxReceipt, VenueBalances,
};
pub use wallet_pool::{DbWalletPool, WalletPool};
