//! Test doubles for the venue seams.
//!
//! Compiled only with the `testkit` feature; used by the gateway's own unit
//! tests and by the server integration tests.

use crate::error::{VenueError, VenueResult};
use crate::exchange::VenueApi;
use crate::types::{
    CloseReceipt, FaucetReceipt, OpenPositionParams, OrderReceipt, RawOpenTrade, TransferParams,
    TxReceipt, VenueBalances,
};
use crate::wallet_pool::WalletPool;
use async_trait::async_trait;
use gateway_core::Position;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory venue double.
///
/// Read queries serve configured data; action calls are counted so tests can
/// assert which venue operations ran.
#[derive(Default)]
pub struct StubVenue {
    pub trades: Mutex<Vec<RawOpenTrade>>,
    pub open_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub withdraw_calls: AtomicUsize,
    pub approve_calls: AtomicUsize,
    pub faucet_calls: AtomicUsize,
}

impl StubVenue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<RawOpenTrade>) -> Self {
        Self {
            trades: Mutex::new(trades),
            ..Self::default()
        }
    }

    pub fn close_call_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn open_call_count(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VenueApi for StubVenue {
    async fn balances(&self, _address: &str) -> VenueResult<VenueBalances> {
        Ok(VenueBalances {
            usdc: "1000.0".to_string(),
            native: "0.5".to_string(),
        })
    }

    async fn positions(&self, _address: &str) -> VenueResult<Vec<Position>> {
        Ok(self
            .trades
            .lock()
            .iter()
            .filter_map(|t| t.normalize())
            .collect())
    }

    async fn open_trades(&self, _address: &str) -> VenueResult<Vec<RawOpenTrade>> {
        Ok(self.trades.lock().clone())
    }

    async fn pair_details(&self) -> VenueResult<Value> {
        Ok(json!([{"pair": "BTC/USD", "maxLeverage": 50}]))
    }

    async fn open_position(
        &self,
        _private_key: &str,
        _params: &OpenPositionParams,
    ) -> VenueResult<OrderReceipt> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        Ok(OrderReceipt {
            order_id: "1001".to_string(),
            tx_hash: "0xfeed".to_string(),
        })
    }

    async fn close_trade(
        &self,
        _private_key: &str,
        _trade_index: u64,
        _trader: Option<&str>,
    ) -> VenueResult<CloseReceipt> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CloseReceipt {
            tx_hash: "0xdead".to_string(),
        })
    }

    async fn withdraw(
        &self,
        _private_key: &str,
        _params: &TransferParams,
        _vault: Option<&str>,
    ) -> VenueResult<TxReceipt> {
        self.withdraw_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TxReceipt {
            tx_hash: "0xbeef".to_string(),
        })
    }

    async fn approve_agent(&self, _user_key: &str, _agent_address: &str) -> VenueResult<TxReceipt> {
        self.approve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TxReceipt {
            tx_hash: "0xcafe".to_string(),
        })
    }

    async fn request_faucet(&self, _address: &str) -> VenueResult<FaucetReceipt> {
        self.faucet_calls.fetch_add(1, Ordering::SeqCst);
        Ok(FaucetReceipt {
            amount: "500".to_string(),
            tx_hash: "0xf00d".to_string(),
        })
    }
}

/// In-memory wallet pool double.
#[derive(Default)]
pub struct StubWalletPool {
    keys: HashMap<String, String>,
}

impl StubWalletPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, address: &str, key: &str) -> Self {
        self.keys.insert(address.to_lowercase(), key.to_string());
        self
    }
}

#[async_trait]
impl WalletPool for StubWalletPool {
    async fn agent_key(&self, address: &str) -> VenueResult<Option<String>> {
        Ok(self.keys.get(&address.to_lowercase()).cloned())
    }
}

/// Wallet pool double that always fails, for error-path tests.
pub struct FailingWalletPool;

#[async_trait]
impl WalletPool for FailingWalletPool {
    async fn agent_key(&self, _address: &str) -> VenueResult<Option<String>> {
        Err(VenueError::WalletPool("database unavailable".to_string()))
    }
}
