//! Action signing and key handling.
//!
//! Exchange actions are authorized by signing the keccak hash of the
//! canonically-serialized action plus nonce with a secp256k1 key. Keys
//! arrive as hex strings (with or without a `0x` prefix); raw bytes are
//! held in zeroizing buffers and never logged.

use crate::error::{VenueError, VenueResult};
use alloy::primitives::{keccak256, Address};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer as AlloySigner;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Signature in the venue wire format.
///
/// v is the recovery id as 27/28, not the raw y-parity bit.
#[derive(Debug, Clone, Serialize)]
pub struct WireSignature {
    pub r: String,
    pub s: String,
    pub v: u8,
}

/// Parse and checksum an EVM address.
///
/// Accepts any letter case; the returned `Address` renders checksummed via
/// `to_checksum`.
pub fn parse_address(input: &str) -> VenueResult<Address> {
    Address::from_str(input.trim()).map_err(|e| VenueError::InvalidAddress(format!("{input}: {e}")))
}

/// Signs exchange actions with a single private key.
pub struct ActionSigner {
    signer: PrivateKeySigner,
}

impl ActionSigner {
    /// Build a signer from a hex-encoded private key.
    pub fn from_hex(hex_key: &str) -> VenueResult<Self> {
        let secret = decode_hex_key(hex_key)?;
        let signer = PrivateKeySigner::from_slice(&secret)
            .map_err(|e| VenueError::InvalidKey(e.to_string()))?;
        Ok(Self { signer })
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign an action payload for the given nonce.
    ///
    /// The signature covers keccak256(serialized action || nonce_be).
    pub async fn sign_action(&self, action: &Value, nonce: u64) -> VenueResult<WireSignature> {
        let mut payload =
            serde_json::to_vec(action).map_err(|e| VenueError::Signing(e.to_string()))?;
        payload.extend_from_slice(&nonce.to_be_bytes());
        let hash = keccak256(&payload);

        let signature = self
            .signer
            .sign_hash(&hash)
            .await
            .map_err(|e| VenueError::Signing(e.to_string()))?;

        Ok(WireSignature {
            r: format!("0x{}", hex::encode(signature.r().to_be_bytes::<32>())),
            s: format!("0x{}", hex::encode(signature.s().to_be_bytes::<32>())),
            // y_parity (0/1) to recovery id (27/28)
            v: 27 + signature.v() as u8,
        })
    }
}

/// Cache of signer instances keyed by a key fingerprint.
///
/// Mirrors the per-request reuse pattern of the venue SDK: the same key
/// always resolves to the same signer instance.
#[derive(Default)]
pub struct SignerCache {
    signers: DashMap<String, Arc<ActionSigner>>,
}

impl SignerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or build the signer for a hex private key.
    pub fn get_or_create(&self, hex_key: &str) -> VenueResult<Arc<ActionSigner>> {
        let fingerprint = key_fingerprint(hex_key)?;
        if let Some(existing) = self.signers.get(&fingerprint) {
            return Ok(Arc::clone(&existing));
        }
        let signer = Arc::new(ActionSigner::from_hex(hex_key)?);
        self.signers.insert(fingerprint, Arc::clone(&signer));
        Ok(signer)
    }

    /// Number of cached signers.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

fn decode_hex_key(hex_key: &str) -> VenueResult<Zeroizing<Vec<u8>>> {
    let trimmed = hex_key.trim().trim_start_matches("0x");
    Ok(Zeroizing::new(
        hex::decode(trimmed).map_err(|e| VenueError::InvalidKey(e.to_string()))?,
    ))
}

/// Fingerprint used as the cache key; never the key material itself.
fn key_fingerprint(hex_key: &str) -> VenueResult<String> {
    let secret = decode_hex_key(hex_key)?;
    Ok(hex::encode(&keccak256(secret.as_slice())[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_KEY: &str = "0x0123456789012345678901234567890123456789012345678901234567890123";

    #[test]
    fn test_parse_address_any_case() {
        let lower = parse_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        let upper = parse_address("0xD8DA6BF26964AF9D7EED9E03E53415D37AA96045").unwrap();
        assert_eq!(lower, upper);
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_signer_from_hex_accepts_prefix_variants() {
        let with_prefix = ActionSigner::from_hex(TEST_KEY).unwrap();
        let without_prefix = ActionSigner::from_hex(&TEST_KEY[2..]).unwrap();
        assert_eq!(with_prefix.address(), without_prefix.address());
    }

    #[test]
    fn test_signer_rejects_garbage() {
        assert!(ActionSigner::from_hex("0xzz").is_err());
        assert!(ActionSigner::from_hex("0x1234").is_err());
    }

    #[tokio::test]
    async fn test_sign_action_is_deterministic_per_nonce() {
        let signer = ActionSigner::from_hex(TEST_KEY).unwrap();
        let action = json!({"type": "order", "asset": 0});

        let sig_a = signer.sign_action(&action, 1).await.unwrap();
        let sig_b = signer.sign_action(&action, 1).await.unwrap();
        let sig_c = signer.sign_action(&action, 2).await.unwrap();

        assert_eq!(sig_a.r, sig_b.r);
        assert_eq!(sig_a.s, sig_b.s);
        assert_ne!((sig_a.r.as_str(), sig_a.s.as_str()), (sig_c.r.as_str(), sig_c.s.as_str()));
        assert!(sig_a.r.starts_with("0x"));
        assert!(sig_a.v == 27 || sig_a.v == 28);
    }

    #[test]
    fn test_signer_cache_reuses_instances() {
        let cache = SignerCache::new();
        let first = cache.get_or_create(TEST_KEY).unwrap();
        let second = cache.get_or_create(TEST_KEY).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
