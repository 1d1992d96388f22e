//! Token issuer/verifier — mints, checks and rate-limits verification tokens.

use crate::error::VerificationError;
use cohort_types::{
    Clock, CohortParams, Identity, IssuedToken, Timestamp, TokenSource, VerificationToken,
};
use std::sync::Arc;

/// Issues and validates the time-stamped tokens used for email verification
/// and passwordless login.
///
/// The issuer only mutates the identity it is handed; persisting the change
/// is the caller's job.
#[derive(Clone)]
pub struct TokenIssuer {
    clock: Arc<dyn Clock>,
    source: Arc<dyn TokenSource>,
    cooldown_secs: u64,
}

impl TokenIssuer {
    pub fn new(clock: Arc<dyn Clock>, source: Arc<dyn TokenSource>, params: &CohortParams) -> Self {
        Self {
            clock,
            source,
            cooldown_secs: params.token_resend_cooldown_secs,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Mint a fresh token and stamp it onto `identity`.
    ///
    /// Any previously issued token stops verifying.
    pub fn issue(&self, identity: &mut Identity) -> Result<VerificationToken, VerificationError> {
        let token = self.source.generate()?;
        identity.token = Some(IssuedToken {
            token: token.clone(),
            issued_at: self.clock.now(),
        });
        tracing::debug!(identity = %identity.id, "verification token issued");
        Ok(token)
    }

    /// Whether `presented` is exactly the identity's current token.
    ///
    /// Never consumes the token. An identity without a token never verifies.
    pub fn verify(&self, identity: &Identity, presented: &str) -> bool {
        identity
            .verification_token()
            .is_some_and(|token| token.matches(presented))
    }

    /// [`verify`](Self::verify) as a typed failure.
    pub fn check(&self, identity: &Identity, presented: &str) -> Result<(), VerificationError> {
        if self.verify(identity, presented) {
            Ok(())
        } else {
            tracing::debug!(identity = %identity.id, "token mismatch");
            Err(VerificationError::TokenMismatch)
        }
    }

    /// Whether a new token may be sent: none was ever issued, or the last
    /// one is older than the cool-down.
    pub fn can_reissue(&self, identity: &Identity) -> bool {
        identity
            .token_issued_at()
            .map_or(true, |at| at.is_older_than(self.cooldown_secs, self.clock.now()))
    }

    /// Seconds until [`can_reissue`](Self::can_reissue) turns true; 0 if it already is.
    pub fn retry_after(&self, identity: &Identity) -> u64 {
        identity.token_issued_at().map_or(0, |at| {
            at.remaining_in_window(self.cooldown_secs, self.clock.now())
        })
    }

    /// Mark the identity's email as verified.
    ///
    /// The token is kept so the same link keeps working for login by email.
    /// Re-verifying an already verified identity keeps the original
    /// `verified_at`.
    pub fn complete_verification(&self, identity: &mut Identity) {
        if identity.verified {
            return;
        }
        identity.verified = true;
        identity.verified_at = Some(self.clock.now());
        tracing::info!(identity = %identity.id, "email verified");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_nullables::{FailingTokenSource, NullClock, NullTokenSource};
    use cohort_types::NewIdentity;

    fn unverified() -> Identity {
        NewIdentity {
            email: "ann@example.com".into(),
            nickname: "ann".into(),
            password_hash: "hash".into(),
        }
        .into_identity()
    }

    fn issuer_at(secs: u64) -> (Arc<NullClock>, TokenIssuer) {
        let clock = Arc::new(NullClock::new(secs));
        let issuer = TokenIssuer::new(
            clock.clone(),
            Arc::new(NullTokenSource::new()),
            &CohortParams::default(),
        );
        (clock, issuer)
    }

    // ── Issue / verify ──────────────────────────────────────────────────

    #[test]
    fn issue_then_verify_exact_token() {
        let (_clock, issuer) = issuer_at(1_000);
        let mut identity = unverified();
        let token = issuer.issue(&mut identity).unwrap();

        assert!(issuer.verify(&identity, token.as_str()));
        assert!(!issuer.verify(&identity, "token-9999"));
        assert!(!issuer.verify(&identity, ""));
        assert_eq!(identity.token_issued_at(), Some(Timestamp::new(1_000)));
    }

    #[test]
    fn verify_without_token_is_false() {
        let (_clock, issuer) = issuer_at(0);
        let identity = unverified();
        assert!(!issuer.verify(&identity, ""));
        assert!(!issuer.verify(&identity, "anything"));
        assert!(matches!(
            issuer.check(&identity, "anything"),
            Err(VerificationError::TokenMismatch)
        ));
    }

    #[test]
    fn verify_is_repeatable() {
        let (_clock, issuer) = issuer_at(0);
        let mut identity = unverified();
        let token = issuer.issue(&mut identity).unwrap();
        for _ in 0..3 {
            assert!(issuer.verify(&identity, token.as_str()));
        }
    }

    #[test]
    fn reissue_invalidates_previous_token() {
        let (_clock, issuer) = issuer_at(0);
        let mut identity = unverified();
        let first = issuer.issue(&mut identity).unwrap();
        let second = issuer.issue(&mut identity).unwrap();
        assert_ne!(first, second);
        assert!(!issuer.verify(&identity, first.as_str()));
        assert!(issuer.verify(&identity, second.as_str()));
    }

    #[test]
    fn entropy_failure_leaves_identity_untouched() {
        let issuer = TokenIssuer::new(
            Arc::new(NullClock::new(0)),
            Arc::new(FailingTokenSource),
            &CohortParams::default(),
        );
        let mut identity = unverified();
        assert!(matches!(
            issuer.issue(&mut identity),
            Err(VerificationError::TokenSource(_))
        ));
        assert!(identity.token.is_none());
    }

    // ── Cool-down ───────────────────────────────────────────────────────

    #[test]
    fn can_reissue_respects_one_hour_window() {
        let (clock, issuer) = issuer_at(10_000);
        let mut identity = unverified();
        assert!(issuer.can_reissue(&identity));
        assert_eq!(issuer.retry_after(&identity), 0);

        issuer.issue(&mut identity).unwrap();
        assert!(!issuer.can_reissue(&identity));
        assert_eq!(issuer.retry_after(&identity), 3601);

        clock.advance(3600);
        assert!(!issuer.can_reissue(&identity));
        assert_eq!(issuer.retry_after(&identity), 1);

        clock.advance(1);
        assert!(issuer.can_reissue(&identity));
        assert_eq!(issuer.retry_after(&identity), 0);
    }

    // ── Completion ──────────────────────────────────────────────────────

    #[test]
    fn complete_verification_keeps_token_and_first_timestamp() {
        let (clock, issuer) = issuer_at(500);
        let mut identity = unverified();
        let token = issuer.issue(&mut identity).unwrap();

        issuer.complete_verification(&mut identity);
        assert!(identity.verified);
        assert_eq!(identity.verified_at, Some(Timestamp::new(500)));
        assert!(issuer.verify(&identity, token.as_str()));

        clock.advance(100);
        issuer.complete_verification(&mut identity);
        assert_eq!(identity.verified_at, Some(Timestamp::new(500)));
    }
}
