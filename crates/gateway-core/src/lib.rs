//! Shared types for the perp gateway services.
//!
//! Defines the market record and lookup types used by the availability
//! cache, the normalized position shape returned by the venue adapter,
//! and the common error type.

pub mod error;
pub mod market;
pub mod types;

pub use error::{CoreError, Result};
pub use market::{canonical_symbol, MarketLookup, MarketMap, MarketRecord};
pub use types::{Network, Position, TradeSide};
