//! Hardcoded fallback market table.
//!
//! Served when the configuration API is unreachable so that trading degrades
//! to a known-safe subset of majors instead of rejecting everything.

use gateway_core::{MarketMap, MarketRecord};
use once_cell::sync::Lazy;

static FALLBACK: Lazy<MarketMap> = Lazy::new(|| {
    [
        ("BTC", 0, "BTC/USD"),
        ("ETH", 1, "ETH/USD"),
        ("SOL", 9, "SOL/USD"),
        ("HYPE", 41, "HYPE/USD"),
        ("XRP", 39, "XRP/USD"),
        ("LINK", 42, "LINK/USD"),
        ("ADA", 43, "ADA/USD"),
    ]
    .into_iter()
    .map(|(symbol, index, name)| (symbol.to_string(), MarketRecord::new(index, name)))
    .collect()
});

/// Well-known markets served when the upstream fetch fails.
pub fn fallback_markets() -> MarketMap {
    FALLBACK.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_table_contents() {
        let markets = fallback_markets();
        assert_eq!(markets.len(), 7);
        assert_eq!(markets["BTC"].index, 0);
        assert_eq!(markets["ETH"].index, 1);
        assert_eq!(markets["SOL"].index, 9);
        assert!(markets.values().all(|m| m.available));
    }
}
