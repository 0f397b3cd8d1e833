//! Market availability cache for the perp gateway.
//!
//! Answers "is symbol X tradable, and what is its venue index and display
//! name" with bounded staleness, without hitting the configuration API on
//! every trade request. A configuration-API outage degrades to a fixed
//! fallback table of majors rather than rejecting all trades.

pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;

pub use cache::{MarketCache, MarketSource, MarketsSnapshot, DEFAULT_TTL};
pub use client::{MarketFetch, MarketsApiClient};
pub use error::{MarketsError, MarketsResult};
pub use fallback::fallback_markets;
