//! Tunable policy values for the token protocol and the group lifecycle.

use serde::{Deserialize, Serialize};

/// Cool-downs and limits shared by every service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortParams {
    // ── Tokens ───────────────────────────────────────────────────────────
    /// Minimum seconds between two token issues for the same identity
    /// (resend-confirmation and login-link requests). Default: 1 hour.
    pub token_resend_cooldown_secs: u64,

    // ── Groups ───────────────────────────────────────────────────────────
    /// Minimum seconds between two recruiting toggles on the same group.
    /// Default: 1 hour.
    pub recruiting_cooldown_secs: u64,

    /// Maximum group title length in characters. Default: 50.
    pub max_title_len: usize,
}

impl CohortParams {
    pub const ONE_HOUR_SECS: u64 = 3600;

    pub fn cohort_defaults() -> Self {
        Self {
            token_resend_cooldown_secs: Self::ONE_HOUR_SECS,
            recruiting_cooldown_secs: Self::ONE_HOUR_SECS,
            max_title_len: 50,
        }
    }
}

impl Default for CohortParams {
    fn default() -> Self {
        Self::cohort_defaults()
    }
}
