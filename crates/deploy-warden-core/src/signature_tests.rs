//! Tests for webhook signature verification.

use super::*;

/// Compute the HMAC-SHA256 of `payload` keyed by `secret` and return it as a
/// `sha256=<hex>` header value, the format GitHub delivers.
fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[test]
fn test_valid_signature_is_accepted() {
    let secret = "my-webhook-secret";
    let payload = br#"{"action":"requested"}"#;
    let header = sign(secret, payload);

    assert!(verify_signature(payload, Some(&header), secret));
}

#[test]
fn test_empty_payload_signs_and_verifies() {
    let secret = "my-webhook-secret";
    let header = sign(secret, b"");

    assert!(verify_signature(b"", Some(&header), secret));
}

#[test]
fn test_mutated_payload_is_rejected() {
    let secret = "my-webhook-secret";
    let payload = br#"{"action":"requested"}"#;
    let header = sign(secret, payload);

    let mut tampered = payload.to_vec();
    tampered[0] ^= 0x01;

    assert!(!verify_signature(&tampered, Some(&header), secret));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let payload = br#"{"action":"requested"}"#;
    let header = sign("the-real-secret", payload);

    assert!(!verify_signature(payload, Some(&header), "a-different-secret"));
}

#[test]
fn test_absent_header_is_rejected() {
    assert!(!verify_signature(b"payload", None, "secret"));
}

#[test]
fn test_empty_header_is_rejected() {
    assert!(!verify_signature(b"payload", Some(""), "secret"));
}

/// A digest without the `sha256=` prefix is not a valid header value even
/// when the hex itself is correct.
#[test]
fn test_unprefixed_digest_is_rejected() {
    let secret = "my-webhook-secret";
    let payload = b"payload";
    let header = sign(secret, payload);
    let unprefixed = header.strip_prefix("sha256=").unwrap();

    assert!(!verify_signature(payload, Some(unprefixed), secret));
}

#[test]
fn test_non_hex_digest_is_rejected() {
    assert!(!verify_signature(
        b"payload",
        Some("sha256=zzzz-not-hex"),
        "secret"
    ));
}

/// A truncated digest must fail cleanly rather than comparing a prefix.
#[test]
fn test_truncated_digest_is_rejected() {
    let secret = "my-webhook-secret";
    let payload = b"payload";
    let header = sign(secret, payload);

    assert!(!verify_signature(payload, Some(&header[..header.len() - 2]), secret));
}
