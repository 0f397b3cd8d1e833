//! Common gateway types.

use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network selection for the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(CoreError::InvalidNetwork(other.to_string())),
        }
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn is_long(&self) -> bool {
        matches!(self, Self::Long)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl FromStr for TradeSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(Self::Long),
            "short" | "sell" => Ok(Self::Short),
            other => Err(CoreError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized open position.
///
/// Produced by the venue adapter from raw open-trade entries; all fixed-point
/// scaling has already been applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Market symbol pair (e.g. "BTC/USD").
    pub market: String,
    /// Direction of the position.
    pub side: TradeSide,
    /// Collateral backing the position, in USDC.
    pub size: Decimal,
    /// Entry price.
    pub entry_price: Decimal,
    /// Leverage multiplier.
    pub leverage: Decimal,
    /// Unrealized profit and loss, in USDC.
    pub unrealized_pnl: Decimal,
    /// Venue trade identifier.
    pub trade_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_parsing() {
        assert_eq!("long".parse::<TradeSide>().unwrap(), TradeSide::Long);
        assert_eq!("SHORT".parse::<TradeSide>().unwrap(), TradeSide::Short);
        assert_eq!(" Buy ".parse::<TradeSide>().unwrap(), TradeSide::Long);
        assert!("sideways".parse::<TradeSide>().is_err());
    }

    #[test]
    fn test_network_default_is_testnet() {
        assert!(Network::default().is_testnet());
        assert_eq!(Network::Mainnet.as_str(), "mainnet");
    }

    #[test]
    fn test_network_parsing() {
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_position_serializes_camel_case() {
        let position = Position {
            market: "BTC/USD".to_string(),
            side: TradeSide::Long,
            size: dec!(100),
            entry_price: dec!(90000),
            leverage: dec!(3),
            unrealized_pnl: Decimal::ZERO,
            trade_id: "42".to_string(),
        };
        let json = serde_json::to_value(&position).unwrap();
        assert_eq!(json["side"], "long");
        assert!(json.get("entryPrice").is_some());
        assert!(json.get("unrealizedPnl").is_some());
        assert!(json.get("tradeId").is_some());
    }
}
