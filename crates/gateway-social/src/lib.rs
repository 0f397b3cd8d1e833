//! Social data API adapter.
//!
//! Proxies tweet fetches to the upstream social API and normalizes the
//! response into one canonical record shape at the boundary. Upstream
//! payloads are inconsistent (bare arrays vs `{"data": [...]}` envelopes,
//! `id`/`tweet_id`, `text`/`content`, `created_at`/`timestamp`); everything
//! downstream of this crate sees a single shape.

pub mod client;
pub mod error;
pub mod normalize;

pub use client::{SocialApiClient, TweetQuery};
pub use error::{SocialError, SocialResult};
pub use normalize::{normalize_tweet, tweet_array, TweetRecord};
