//! Authentication bridge — turns a successful check into an explicit principal.
//!
//! There is no process-wide "current user". Callers receive a [`Principal`]
//! and pass it to every later operation that needs to know who is acting.

use crate::error::VerificationError;
use crate::issuer::TokenIssuer;
use cohort_types::{Identity, IdentityId, Timestamp};
use serde::{Deserialize, Serialize};

/// How a principal was authenticated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    /// Signed in immediately after registering.
    SignUp,
    /// Presented a valid emailed token.
    EmailToken,
    /// Password matched (decided by the excluded hasher).
    Password,
}

/// An authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub identity_id: IdentityId,
    pub nickname: String,
    pub email: String,
    pub verified: bool,
    pub method: AuthMethod,
    pub authenticated_at: Timestamp,
}

/// Decides whether authentication is permitted and builds the principal.
///
/// Carrying the principal across requests (sessions, remember-me cookies)
/// is left to the caller.
#[derive(Clone)]
pub struct AuthenticationBridge {
    issuer: TokenIssuer,
}

impl AuthenticationBridge {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }

    fn principal(&self, identity: &Identity, method: AuthMethod) -> Principal {
        Principal {
            identity_id: identity.id,
            nickname: identity.nickname.clone(),
            email: identity.email.clone(),
            verified: identity.verified,
            method,
            authenticated_at: self.issuer.now(),
        }
    }

    /// Principal for an identity that has just registered.
    pub fn sign_up(&self, identity: &Identity) -> Principal {
        self.principal(identity, AuthMethod::SignUp)
    }

    /// Authenticate by emailed token.
    pub fn by_token(
        &self,
        identity: &Identity,
        presented: &str,
    ) -> Result<Principal, VerificationError> {
        self.issuer.check(identity, presented)?;
        tracing::info!(identity = %identity.id, "logged in by email token");
        Ok(self.principal(identity, AuthMethod::EmailToken))
    }

    /// Authenticate by password; `matched` is the verdict of the password hasher.
    pub fn by_password(
        &self,
        identity: &Identity,
        matched: bool,
    ) -> Result<Principal, VerificationError> {
        if !matched {
            tracing::info!(identity = %identity.id, "password rejected");
            return Err(VerificationError::BadCredentials);
        }
        Ok(self.principal(identity, AuthMethod::Password))
    }

    /// Rebuild a principal after the identity changed (e.g. a new nickname),
    /// keeping the original authentication method.
    pub fn refresh(
        &self,
        identity: &Identity,
        previous: &Principal,
    ) -> Result<Principal, VerificationError> {
        if identity.id != previous.identity_id {
            return Err(VerificationError::PrincipalMismatch);
        }
        Ok(self.principal(identity, previous.method))
    }
}
