//! HMAC-SHA256 payload signing.
//!
//! The signature is the lowercase hex HMAC-SHA256 of the exact request body
//! bytes. Receivers recompute it with the shared key to check that the
//! payload came from kubewatch and was not modified in transit.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex encoded SHA-256 MAC.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// A keyed HMAC-SHA256 instance, ready to sign payloads.
///
/// The key is absorbed once at construction; signing clones the keyed state
/// so concurrent dispatches never share a MAC in progress.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    /// Creates a signing key from raw key bytes of any length.
    pub fn new(key: &[u8]) -> Self {
        // HMAC pads or hashes any key to the block size.
        #[allow(clippy::expect_used)]
        let mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
        Self { mac }
    }

    /// Signs `payload`, returning the lowercase hex digest.
    ///
    /// ```
    /// use kubewatch_webhook::signing::SigningKey;
    ///
    /// let key = SigningKey::new(b"key");
    /// let signature = key.sign(b"The quick brown fox jumps over the lazy dog");
    /// assert_eq!(
    ///     signature,
    ///     "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
    /// );
    /// ```
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a hex signature against `payload` in constant time.
    ///
    /// Accepts upper or lower case hex. Anything that is not valid hex of
    /// the right length is rejected.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        if signature.len() != SIGNATURE_HEX_LEN {
            return false;
        }

        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(&expected).is_ok()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
