//! Raw venue payloads and their normalization.
//!
//! The venue's open-trade entries are loosely typed: amounts arrive as
//! strings or numbers, identifiers as `tradeID` or `index` depending on the
//! endpoint generation. Everything is mapped into the canonical `Position`
//! shape here; entries the mapper cannot parse are dropped by the caller,
//! never half-filled.

use gateway_core::{canonical_symbol, Position, TradeSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Collateral amounts are 1e6 fixed-point (USDC decimals).
const COLLATERAL_SCALE: u32 = 6;
/// Prices are 1e18 fixed-point.
const PRICE_SCALE: u32 = 18;
/// Leverage is reported x100.
const LEVERAGE_SCALE: u32 = 2;

/// A JSON value that may arrive as a string or a number.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawAmount {
    /// Parse into a `Decimal`, scaled down by `10^scale`.
    pub fn to_decimal(&self, scale: u32) -> Option<Decimal> {
        let value = match self {
            Self::Text(s) => s.trim().parse::<Decimal>().ok()?,
            Self::Int(n) => Decimal::from(*n),
            Self::Float(f) => Decimal::try_from(*f).ok()?,
        };
        Some(value / Decimal::from(10u64.pow(scale)))
    }

    /// Render as a plain string (for identifiers).
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
        }
    }
}

/// Pair descriptor on a raw trade.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTradePair {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl RawTradePair {
    /// Symbol pair as "FROM/TO", defaulting the quote to USD.
    pub fn market_symbol(&self) -> String {
        let base = self.from.as_deref().unwrap_or("UNKNOWN");
        let quote = self.to.as_deref().unwrap_or("USD");
        format!("{}/{}", canonical_symbol(base), canonical_symbol(quote))
    }
}

/// Raw open-trade entry from the venue info endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawOpenTrade {
    #[serde(default)]
    pub pair: Option<RawTradePair>,
    #[serde(default)]
    pub collateral: Option<RawAmount>,
    #[serde(rename = "openPrice", default)]
    pub open_price: Option<RawAmount>,
    #[serde(default)]
    pub leverage: Option<RawAmount>,
    #[serde(rename = "isBuy", default)]
    pub is_buy: bool,
    /// Newer entries carry `tradeID`; older ones only `index`.
    #[serde(rename = "tradeID", default)]
    pub trade_id: Option<RawAmount>,
    #[serde(default)]
    pub index: Option<RawAmount>,
    #[serde(default)]
    pub pnl: Option<RawAmount>,
}

impl RawOpenTrade {
    /// Whether this trade is on the given market symbol.
    ///
    /// Accepts either the bare base symbol ("BTC") or the pair form
    /// ("BTC/USD" or "BTC-USD"), case-insensitively.
    pub fn matches_market(&self, symbol: &str) -> bool {
        let Some(pair) = &self.pair else {
            return false;
        };
        let wanted = canonical_symbol(symbol).replace('-', "/");
        let base = pair
            .from
            .as_deref()
            .map(canonical_symbol)
            .unwrap_or_default();
        base == wanted || pair.market_symbol() == wanted
    }

    /// Venue-side index used to close this trade.
    pub fn trade_index(&self) -> Option<u64> {
        self.index
            .as_ref()
            .and_then(|i| i.to_plain_string().parse().ok())
    }

    /// Identifier for display: `tradeID` falling back to `index`.
    pub fn identifier(&self) -> String {
        self.trade_id
            .as_ref()
            .or(self.index.as_ref())
            .map(|v| v.to_plain_string())
            .unwrap_or_else(|| "0".to_string())
    }

    /// Realized PnL as reported on the snapshot, zero when absent.
    pub fn realized_pnl(&self) -> Decimal {
        self.pnl
            .as_ref()
            .and_then(|p| p.to_decimal(0))
            .unwrap_or(Decimal::ZERO)
    }

    /// Normalize into the canonical position shape.
    ///
    /// Returns `None` when the entry is missing the fields needed to build
    /// a coherent position.
    pub fn normalize(&self) -> Option<Position> {
        let pair = self.pair.as_ref()?;
        let size = self.collateral.as_ref()?.to_decimal(COLLATERAL_SCALE)?;
        let entry_price = self.open_price.as_ref()?.to_decimal(PRICE_SCALE)?;
        let leverage = self.leverage.as_ref()?.to_decimal(LEVERAGE_SCALE)?;

        Some(Position {
            market: pair.market_symbol(),
            side: if self.is_buy {
                TradeSide::Long
            } else {
                TradeSide::Short
            },
            size,
            entry_price,
            leverage,
            unrealized_pnl: Decimal::ZERO,
            trade_id: self.identifier(),
        })
    }
}

/// Account balances from the venue info endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VenueBalances {
    /// USDC balance, stringly as the venue reports it.
    pub usdc: String,
    /// Native gas token balance.
    pub native: String,
}

/// Parameters for opening a position.
#[derive(Debug, Clone)]
pub struct OpenPositionParams {
    pub asset_index: u32,
    pub market: String,
    pub collateral: Decimal,
    pub side: TradeSide,
    pub leverage: Decimal,
    /// User address when an agent trades on the user's behalf.
    pub trader: Option<String>,
    /// Reference price sent with the market order.
    pub reference_price: Decimal,
}

/// Parameters for a USDC withdrawal.
#[derive(Debug, Clone)]
pub struct TransferParams {
    pub to: String,
    pub amount: Decimal,
}

/// Receipt for a submitted order.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order_id: String,
    pub tx_hash: String,
}

/// Receipt for a close action.
#[derive(Debug, Clone)]
pub struct CloseReceipt {
    pub tx_hash: String,
}

/// Receipt for a generic transaction-producing action.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// Receipt for a faucet request.
#[derive(Debug, Clone)]
pub struct FaucetReceipt {
    pub amount: String,
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_trade() -> RawOpenTrade {
        serde_json::from_value(serde_json::json!({
            "pair": {"from": "BTC", "to": "USD"},
            "collateral": "100000000",
            "openPrice": "90000000000000000000000",
            "leverage": 300,
            "isBuy": true,
            "tradeID": "7",
            "index": 2,
            "pnl": "12"
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_scales_fixed_point() {
        let position = sample_trade().normalize().unwrap();
        assert_eq!(position.market, "BTC/USD");
        assert_eq!(position.side, TradeSide::Long);
        assert_eq!(position.size, dec!(100));
        assert_eq!(position.entry_price, dec!(90000));
        assert_eq!(position.leverage, dec!(3));
        assert_eq!(position.trade_id, "7");
    }

    #[test]
    fn test_identifier_falls_back_to_index() {
        let mut trade = sample_trade();
        trade.trade_id = None;
        assert_eq!(trade.identifier(), "2");
        assert_eq!(trade.trade_index(), Some(2));
    }

    #[test]
    fn test_matches_market_variants() {
        let trade = sample_trade();
        assert!(trade.matches_market("btc"));
        assert!(trade.matches_market("BTC/USD"));
        assert!(trade.matches_market("BTC-USD"));
        assert!(!trade.matches_market("ETH"));
    }

    #[test]
    fn test_normalize_rejects_incomplete_entry() {
        let trade: RawOpenTrade = serde_json::from_value(serde_json::json!({
            "pair": {"from": "BTC"},
            "isBuy": false
        }))
        .unwrap();
        assert!(trade.normalize().is_none());
    }

    #[test]
    fn test_raw_amount_shapes() {
        let amounts: Vec<RawAmount> =
            serde_json::from_value(serde_json::json!(["150", 150, 150.0])).unwrap();
        for amount in &amounts {
            assert_eq!(amount.to_decimal(1), Some(dec!(15)));
        }
    }

    #[test]
    fn test_realized_pnl_default_zero() {
        let mut trade = sample_trade();
        assert_eq!(trade.realized_pnl(), dec!(12));
        trade.pnl = None;
        assert_eq!(trade.realized_pnl(), Decimal::ZERO);
    }
}
