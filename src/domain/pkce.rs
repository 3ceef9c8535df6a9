// src/domain/pkce.rs
//! PKCE (RFC 7636) verifier/challenge validation, S256 only.
//!
//! Pure functions, no I/O. The token endpoint uses [`validate`] to bind an
//! authorization code redemption back to the request that created it.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// The only challenge method accepted by the bridge.
pub const METHOD_S256: &str = "S256";

/// Compute the S256 challenge for a verifier:
/// `base64url(SHA-256(ascii verifier))`, unpadded.
pub fn compute_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// RFC 7636 verifier format: 43-128 characters from the unreserved set
/// `[A-Za-z0-9\-._~]`.
pub fn is_valid_verifier(verifier: &str) -> bool {
    if verifier.len() < 43 || verifier.len() > 128 {
        return false;
    }
    verifier
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

/// An S256 challenge is always 43 base64url characters (256 bits, unpadded).
pub fn is_valid_challenge(challenge: &str) -> bool {
    challenge.len() == 43
        && challenge
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_'))
}

/// Validate a verifier against a stored challenge. Returns false (never
/// errors) for any unsupported method, malformed verifier, or mismatch.
///
/// The comparison is constant time. A short-circuiting equality check would
/// leak how many leading characters of the derived challenge matched,
/// weakening the binding between authorization and token exchange.
pub fn validate(verifier: &str, challenge: &str, method: &str) -> bool {
    if method != METHOD_S256 {
        return false;
    }
    if !is_valid_verifier(verifier) {
        return false;
    }
    let expected = compute_challenge(verifier);
    expected.as_bytes().ct_eq(challenge.as_bytes()).into()
}
