//! Nullable token source — predictable tokens for testing.

use cohort_types::{TokenSource, TokenSourceError, VerificationToken};
use std::sync::Mutex;

/// Hands out tokens from a fixed script, then falls back to a counter.
///
/// Scripted tokens let a test know the exact value a service will mint;
/// the counter keeps every later token distinct.
pub struct NullTokenSource {
    scripted: Mutex<Vec<String>>,
    issued: Mutex<u64>,
}

impl NullTokenSource {
    /// Counter-only source: `token-0001`, `token-0002`, ...
    pub fn new() -> Self {
        Self::scripted(Vec::<String>::new())
    }

    /// Returns `tokens` in order before falling back to the counter.
    pub fn scripted(tokens: Vec<impl Into<String>>) -> Self {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        tokens.reverse();
        Self {
            scripted: Mutex::new(tokens),
            issued: Mutex::new(0),
        }
    }

    /// Number of tokens generated so far.
    pub fn issued(&self) -> u64 {
        *self.issued.lock().unwrap()
    }
}

impl Default for NullTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for NullTokenSource {
    fn generate(&self) -> Result<VerificationToken, TokenSourceError> {
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        let token = self
            .scripted
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| format!("token-{:04}", *issued));
        Ok(VerificationToken::new(token))
    }
}

/// A token source whose entropy is never available.
pub struct FailingTokenSource;

impl TokenSource for FailingTokenSource {
    fn generate(&self) -> Result<VerificationToken, TokenSourceError> {
        Err(TokenSourceError("entropy unavailable".to_string()))
    }
}
