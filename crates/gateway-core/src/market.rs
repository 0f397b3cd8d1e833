//! Market records and availability lookup results.
//!
//! A market is identified by its uppercase symbol (e.g. "BTC") and carries
//! the venue-specific asset index plus a display name. The collection is an
//! unordered symbol-keyed map, replaced wholesale on every cache refresh.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single tradable market as reported by the configuration API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Venue-specific asset index used when submitting trade actions.
    pub index: u32,
    /// Display name (e.g. "BTC/USD").
    pub name: String,
    /// Whether the market currently accepts trades.
    pub available: bool,
}

impl MarketRecord {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            available: true,
        }
    }
}

/// Symbol -> market record mapping. Keys are canonical (uppercase) symbols.
pub type MarketMap = HashMap<String, MarketRecord>;

/// Canonicalize a market symbol for lookup.
///
/// Symbols are matched case-insensitively; the canonical form is trimmed
/// and uppercased.
pub fn canonical_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Result of a market validation lookup.
///
/// Absence of a symbol is a normal, expected outcome and is communicated
/// through `NotFound`, never through an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketLookup {
    /// The symbol is listed; carries the full record.
    Found(MarketRecord),
    /// The symbol is not in the current market map.
    NotFound,
}

impl MarketLookup {
    /// Whether the symbol resolved to an available market.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Found(record) if record.available)
    }

    /// Venue asset index, if the symbol resolved.
    pub fn asset_index(&self) -> Option<u32> {
        match self {
            Self::Found(record) => Some(record.index),
            Self::NotFound => None,
        }
    }

    /// Display name, if the symbol resolved.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Found(record) => Some(record.name.as_str()),
            Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_symbol() {
        assert_eq!(canonical_symbol("btc"), "BTC");
        assert_eq!(canonical_symbol(" Eth "), "ETH");
        assert_eq!(canonical_symbol("SOL"), "SOL");
    }

    #[test]
    fn test_lookup_found() {
        let lookup = MarketLookup::Found(MarketRecord::new(0, "BTC/USD"));
        assert!(lookup.is_available());
        assert_eq!(lookup.asset_index(), Some(0));
        assert_eq!(lookup.display_name(), Some("BTC/USD"));
    }

    #[test]
    fn test_lookup_not_found() {
        let lookup = MarketLookup::NotFound;
        assert!(!lookup.is_available());
        assert_eq!(lookup.asset_index(), None);
        assert_eq!(lookup.display_name(), None);
    }

    #[test]
    fn test_unavailable_record_is_not_available() {
        let mut record = MarketRecord::new(7, "DOGE/USD");
        record.available = false;
        assert!(!MarketLookup::Found(record).is_available());
    }

    #[test]
    fn test_market_record_wire_shape() {
        let record: MarketRecord =
            serde_json::from_str(r#"{"index":9,"name":"SOL/USD","available":true}"#).unwrap();
        assert_eq!(record.index, 9);
        assert_eq!(record.name, "SOL/USD");
        assert!(record.available);
    }
}
