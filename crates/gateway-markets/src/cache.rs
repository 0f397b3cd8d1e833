//! TTL cache over the configuration API market map.
//!
//! The cached map is replaced wholesale (a single `Arc` assignment) on every
//! refresh, so readers observe either the previous map or the fully built new
//! one. A failed refresh substitutes the fallback table and stamps the cache
//! the same way a successful one would; upstream unavailability is absorbed
//! here and never surfaces to callers as an error.

use crate::client::MarketFetch;
use crate::fallback::fallback_markets;
use gateway_core::{canonical_symbol, MarketLookup, MarketMap};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Default cache time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Where the currently cached map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSource {
    /// Fetched from the configuration API.
    Upstream,
    /// Hardcoded fallback table substituted after a fetch failure.
    Fallback,
}

/// A point-in-time view of the market map.
#[derive(Debug, Clone)]
pub struct MarketsSnapshot {
    pub markets: Arc<MarketMap>,
    pub source: MarketSource,
}

#[derive(Clone)]
struct CacheEntry {
    markets: Arc<MarketMap>,
    source: MarketSource,
    refreshed_at: Instant,
}

/// In-process market availability cache with lazy, time-based invalidation.
///
/// Constructed once at startup and shared by all request handlers; there is
/// no background refresh and no cross-process coordination.
pub struct MarketCache {
    fetcher: Arc<dyn MarketFetch>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl MarketCache {
    pub fn new(fetcher: Arc<dyn MarketFetch>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Return the market map, refreshing from upstream when the cached copy
    /// is absent, expired, or `force_refresh` is set.
    ///
    /// Never fails: any fetch problem is logged and the fallback table is
    /// cached and returned in its place.
    pub async fn get_available_markets(&self, force_refresh: bool) -> MarketsSnapshot {
        if !force_refresh {
            let guard = self.entry.read();
            if let Some(entry) = guard.as_ref() {
                if entry.refreshed_at.elapsed() < self.ttl {
                    return MarketsSnapshot {
                        markets: Arc::clone(&entry.markets),
                        source: entry.source,
                    };
                }
            }
        }

        // Lock is not held across the fetch; concurrent misses may race to
        // refresh and the last wholesale replace wins.
        let (markets, source) = match self.fetcher.fetch_markets().await {
            Ok(markets) => {
                info!(count = markets.len(), "Refreshed market map from upstream");
                (Arc::new(markets), MarketSource::Upstream)
            }
            Err(e) => {
                warn!(error = %e, "Market fetch failed, serving fallback table");
                (Arc::new(fallback_markets()), MarketSource::Fallback)
            }
        };

        let entry = CacheEntry {
            markets: Arc::clone(&markets),
            source,
            refreshed_at: Instant::now(),
        };
        *self.entry.write() = Some(entry);

        MarketsSnapshot { markets, source }
    }

    /// Case-insensitive availability lookup.
    ///
    /// Unknown symbols resolve to `NotFound`; this is a normal outcome, not
    /// an error, even when the cache is serving fallback data.
    pub async fn validate_market(&self, symbol: &str) -> MarketLookup {
        let snapshot = self.get_available_markets(false).await;
        match snapshot.markets.get(&canonical_symbol(symbol)) {
            Some(record) => MarketLookup::Found(record.clone()),
            None => MarketLookup::NotFound,
        }
    }

    /// Source of the currently cached map, if populated.
    pub fn source(&self) -> Option<MarketSource> {
        self.entry.read().as_ref().map(|entry| entry.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MarketsError, MarketsResult};
    use async_trait::async_trait;
    use gateway_core::MarketRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that counts calls and either succeeds with a fixed map or fails.
    struct CountingFetcher {
        calls: AtomicUsize,
        result: Option<MarketMap>,
    }

    impl CountingFetcher {
        fn succeeding(markets: MarketMap) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Some(markets),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketFetch for CountingFetcher {
        async fn fetch_markets(&self) -> MarketsResult<MarketMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Some(markets) => Ok(markets.clone()),
                None => Err(MarketsError::HttpClient("connection refused".to_string())),
            }
        }
    }

    fn btc_only() -> MarketMap {
        [("BTC".to_string(), MarketRecord::new(0, "BTC/USD"))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl_fetches_once() {
        let fetcher = Arc::new(CountingFetcher::succeeding(btc_only()));
        let cache = MarketCache::new(fetcher.clone(), DEFAULT_TTL);

        let first = cache.get_available_markets(false).await;
        let second = cache.get_available_markets(false).await;

        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(first.source, MarketSource::Upstream);
        assert!(Arc::ptr_eq(&first.markets, &second.markets));
    }

    #[tokio::test]
    async fn test_force_refresh_always_fetches() {
        let fetcher = Arc::new(CountingFetcher::succeeding(btc_only()));
        let cache = MarketCache::new(fetcher.clone(), DEFAULT_TTL);

        cache.get_available_markets(false).await;
        cache.get_available_markets(true).await;
        cache.get_available_markets(true).await;

        assert_eq!(fetcher.call_count(), 3);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let fetcher = Arc::new(CountingFetcher::succeeding(btc_only()));
        let cache = MarketCache::new(fetcher.clone(), Duration::ZERO);

        cache.get_available_markets(false).await;
        cache.get_available_markets(false).await;

        assert_eq!(fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_serves_and_caches_fallback() {
        let fetcher = Arc::new(CountingFetcher::failing());
        let cache = MarketCache::new(fetcher.clone(), DEFAULT_TTL);

        let snapshot = cache.get_available_markets(false).await;
        assert_eq!(snapshot.source, MarketSource::Fallback);
        assert_eq!(snapshot.markets.len(), 7);
        assert_eq!(snapshot.markets["BTC"].index, 0);
        assert_eq!(snapshot.markets["ETH"].index, 1);
        assert_eq!(snapshot.markets["SOL"].index, 9);

        // The fallback is cached like a successful fetch; no re-fetch inside the TTL.
        cache.get_available_markets(false).await;
        assert_eq!(fetcher.call_count(), 1);
        assert_eq!(cache.source(), Some(MarketSource::Fallback));
    }

    #[tokio::test]
    async fn test_validate_is_case_insensitive() {
        let fetcher = Arc::new(CountingFetcher::succeeding(btc_only()));
        let cache = MarketCache::new(fetcher, DEFAULT_TTL);

        for symbol in ["btc", "BTC", "Btc"] {
            let lookup = cache.validate_market(symbol).await;
            assert_eq!(lookup.asset_index(), Some(0), "symbol {symbol}");
            assert_eq!(lookup.display_name(), Some("BTC/USD"));
            assert!(lookup.is_available());
        }

        for symbol in ["doge", "DOGE", "Doge"] {
            assert_eq!(cache.validate_market(symbol).await, MarketLookup::NotFound);
        }
    }

    #[tokio::test]
    async fn test_fallback_symbols_validate_when_upstream_down() {
        let cache = MarketCache::new(Arc::new(CountingFetcher::failing()), DEFAULT_TTL);

        let lookup = cache.validate_market("sol").await;
        assert!(lookup.is_available());
        assert_eq!(lookup.asset_index(), Some(9));
        assert_eq!(lookup.display_name(), Some("SOL/USD"));

        assert_eq!(cache.validate_market("PEPE").await, MarketLookup::NotFound);
    }
}
