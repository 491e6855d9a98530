//! Sign in with Apple request nonce.
//!
//! The request carries the SHA-256 hex digest of a random string; the raw
//! string is kept and later handed to the identity backend together with the
//! provider's token so the backend can match the two.

use super::types::AuthError;
use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Characters a nonce is drawn from.
pub const NONCE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVXYZabcdefghijklmnopqrstuvwxyz-._";

pub const NONCE_LENGTH: usize = 32;

/// A raw nonce and its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce {
    raw: String,
    hashed: String,
}

impl Nonce {
    /// Generates a nonce from the OS secure random source.
    pub fn generate() -> Result<Self, AuthError> {
        Self::generate_with(NONCE_LENGTH, getrandom::getrandom)
    }

    /// Generates a nonce of `length` characters from bytes produced by `fill`.
    ///
    /// Bytes that fall outside the charset range are discarded, so every
    /// character is equally likely.
    pub fn generate_with<F, E>(length: usize, mut fill: F) -> Result<Self, AuthError>
    where
        F: FnMut(&mut [u8]) -> Result<(), E>,
        E: Display,
    {
        let mut raw = String::with_capacity(length);
        let mut buffer = [0u8; 16];
        while raw.len() < length {
            fill(&mut buffer).map_err(|err| AuthError::EntropyUnavailable(err.to_string()))?;
            for byte in buffer {
                if raw.len() == length {
                    break;
                }
                if let Some(&ch) = NONCE_CHARSET.get(byte as usize) {
                    raw.push(char::from(ch));
                }
            }
        }
        let hashed = sha256_hex(&raw);
        Ok(Self { raw, hashed })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn hashed(&self) -> &str {
        &self.hashed
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}

/// Lowercase hex SHA-256 digest of `input`.
pub fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
