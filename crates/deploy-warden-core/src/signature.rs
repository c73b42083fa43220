//! Webhook signature verification.
//!
//! GitHub signs every delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and presents the digest in the
//! `X-Hub-Signature-256` header as `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify an `X-Hub-Signature-256` header against the raw request body.
///
/// Returns `false` when the header is absent, empty, missing the `sha256=`
/// prefix, or not valid hex — never an error. The digest comparison is
/// constant time (`Mac::verify_slice`), so the check leaks no timing signal
/// about how much of the signature matched.
///
/// Callers decide whether verification applies at all: when no secret is
/// configured the service skips this check entirely, which is an explicit
/// deployer opt-out documented on the configuration type.
pub fn verify_signature(payload: &[u8], signature_header: Option<&str>, secret: &str) -> bool {
    let Some(header) = signature_header else {
        return false;
    };
    let Some(hex_digest) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(signature) = hex::decode(hex_digest) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
