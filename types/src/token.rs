//! Opaque verification tokens and the entropy source that mints them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Number of random bytes in a freshly generated token (128 bits).
pub const TOKEN_ENTROPY_BYTES: usize = 16;

/// An opaque credential proving control of an email address.
///
/// Compared byte-for-byte: no case folding, trimming or other normalisation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison against a presented string.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

// Tokens end up in log lines through `Debug`; keep the secret out of them.
impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationToken(<{} chars>)", self.0.len())
    }
}

#[derive(Debug, Error)]
#[error("token entropy source failed: {0}")]
pub struct TokenSourceError(pub String);

/// Mints fresh, unguessable tokens.
pub trait TokenSource: Send + Sync {
    fn generate(&self) -> Result<VerificationToken, TokenSourceError>;
}

/// Draws [`TOKEN_ENTROPY_BYTES`] from the operating system and hex-encodes them.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsTokenSource;

impl TokenSource for OsTokenSource {
    fn generate(&self) -> Result<VerificationToken, TokenSourceError> {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        getrandom::getrandom(&mut bytes).map_err(|e| TokenSourceError(e.to_string()))?;
        Ok(VerificationToken(hex::encode(bytes)))
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn generate(&self) -> Result<VerificationToken, TokenSourceError> {
        (**self).generate()
    }
}
