// src/credentials.rs
//! Session credentials and one-way digests
//!
//! Tokens are raw OS entropy rendered as padded standard base64. They carry no
//! semantics and no expiry; whoever hands them out decides how long they live.
//! Digests are SHA-512 rendered as lowercase hex and are used to check a
//! presented secret against a stored value.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::trace;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::error::EntropyError;

/// Default number of entropy bytes in a session token (256 bits)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Largest token the binary will generate
pub const MAX_TOKEN_BYTES: usize = 4096;

/// Length of a rendered digest in hex characters
pub const DIGEST_HEX_LEN: usize = 128;

/// Draw `byte_len` bytes from the OS entropy source and render them as base64
///
/// A failing entropy source is reported as `EntropyError` rather than
/// handled here; it must reach the process supervisor.
pub fn generate_token(byte_len: usize) -> Result<String, EntropyError> {
    let mut bytes = Zeroizing::new(vec![0u8; byte_len]);
    OsRng.try_fill_bytes(&mut bytes)?;
    trace!("Generated {}-byte token", byte_len);
    Ok(BASE64.encode(bytes.as_slice()))
}

/// SHA-512 of the UTF-8 bytes of `input`, as 128 lowercase hex characters
pub fn digest(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check `input` against a previously stored digest
///
/// Hex case is ignored. The comparison always walks the full digest.
pub fn verify_digest(input: &str, expected_hex: &str) -> bool {
    let actual = digest(input);
    let expected = expected_hex.to_ascii_lowercase();
    if actual.len() != expected.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// An unguessable session credential
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate(byte_len: usize) -> Result<Self, EntropyError> {
        generate_token(byte_len).map(SessionToken)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest suitable for storing instead of the token itself
    pub fn digest(&self) -> String {
        digest(&self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keep tokens out of debug logs
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_digest_is_deterministic() {
        let first = digest("abc");
        assert_eq!(first, digest("abc"));
        assert_eq!(first.len(), DIGEST_HEX_LEN);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            digest("abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_verify_digest() {
        let stored = digest("hunter2");
        assert!(verify_digest("hunter2", &stored));
        assert!(verify_digest("hunter2", &stored.to_uppercase()));
        assert!(!verify_digest("hunter3", &stored));
        assert!(!verify_digest("hunter2", &stored[..64]));
        assert!(!verify_digest("hunter2", ""));
    }

    #[test]
    fn test_token_length_and_alphabet() {
        let token = generate_token(32).unwrap();
        // 32 bytes -> 44 padded base64 characters
        assert_eq!(token.len(), 44);
        assert!(token.ends_with('='));
        assert_eq!(BASE64.decode(&token).unwrap().len(), 32);

        assert_eq!(generate_token(0).unwrap(), "");
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_token(16).unwrap()));
        }
    }

    #[test]
    fn test_session_token_hides_value_in_debug() {
        let token = SessionToken::generate(DEFAULT_TOKEN_BYTES).unwrap();
        assert_eq!(format!("{:?}", token), "SessionToken(..)");
        assert_eq!(token.to_string(), token.as_str());
        assert!(verify_digest(token.as_str(), &token.digest()));
    }
}
