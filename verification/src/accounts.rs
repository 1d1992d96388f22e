//! Account service — registration, email verification and login flows over
//! an [`IdentityStore`].

use crate::auth::{AuthenticationBridge, Principal};
use crate::error::VerificationError;
use crate::issuer::TokenIssuer;
use cohort_store::{IdentityStore, StoreError};
use cohort_types::{
    Clock, CohortParams, Identity, IdentityId, NewIdentity, NotificationKind,
    NotificationSettings, Notifier, ProfileUpdate, TokenSource, VerificationToken,
};
use cohort_utils::format_duration;
use std::sync::Arc;

/// Result of following a sign-up confirmation link.
#[derive(Clone, Debug)]
pub struct VerifiedEmail {
    pub principal: Principal,
    pub identity: Identity,
    /// Number of registered identities, shown on the welcome page.
    pub identity_count: u64,
}

/// Drives the token protocol against persisted identities.
///
/// Every mutation is a load-modify-save. A save that loses a race is retried
/// once against freshly loaded state, re-running every guard.
pub struct AccountService {
    store: Arc<dyn IdentityStore>,
    issuer: TokenIssuer,
    auth: AuthenticationBridge,
    notifier: Arc<dyn Notifier>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        notifier: Arc<dyn Notifier>,
        params: &CohortParams,
    ) -> Self {
        let issuer = TokenIssuer::new(clock, tokens, params);
        Self {
            store,
            auth: AuthenticationBridge::new(issuer.clone()),
            issuer,
            notifier,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn auth(&self) -> &AuthenticationBridge {
        &self.auth
    }

    // ── Registration and verification ───────────────────────────────────

    /// Register a new, unverified identity and send its confirmation token.
    pub fn register(&self, new: NewIdentity) -> Result<(Identity, Principal), VerificationError> {
        if self.store.email_exists(&new.email)? {
            return Err(VerificationError::EmailTaken(new.email));
        }
        if self.store.nickname_exists(&new.nickname)? {
            return Err(VerificationError::NicknameTaken(new.nickname));
        }

        let (email, nickname) = (new.email.clone(), new.nickname.clone());
        let mut identity = new.into_identity();
        let token = self.issuer.issue(&mut identity)?;
        let identity = match self.store.insert_identity(identity) {
            Ok(identity) => identity,
            // A concurrent registration took the email or nickname first.
            Err(StoreError::Duplicate(_)) => {
                return Err(if self.store.email_exists(&email)? {
                    VerificationError::EmailTaken(email)
                } else {
                    VerificationError::NicknameTaken(nickname)
                });
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            identity = %identity.id,
            nickname = %identity.nickname,
            "identity registered"
        );

        self.notifier
            .notify(&identity, NotificationKind::SignUpConfirmation, &token);
        let principal = self.auth.sign_up(&identity);
        Ok((identity, principal))
    }

    /// Send a new confirmation token, at most once per cool-down window.
    pub fn resend_confirmation(&self, id: IdentityId) -> Result<(), VerificationError> {
        let (identity, token) = self.update(id, |identity| self.reissue(identity))?;
        self.notifier
            .notify(&identity, NotificationKind::SignUpConfirmation, &token);
        Ok(())
    }

    /// Follow a confirmation link: check the token and mark the email verified.
    pub fn check_email_token(
        &self,
        email: &str,
        token: &str,
    ) -> Result<VerifiedEmail, VerificationError> {
        let id = self.find_by_email(email)?.id;
        let (identity, ()) = self.update(id, |identity| {
            self.issuer.check(identity, token)?;
            self.issuer.complete_verification(identity);
            Ok(())
        })?;
        Ok(VerifiedEmail {
            principal: self.auth.sign_up(&identity),
            identity_count: self.store.identity_count()?,
            identity,
        })
    }

    // ── Login ───────────────────────────────────────────────────────────

    /// Send a passwordless login link, at most once per cool-down window.
    pub fn send_login_link(&self, email: &str) -> Result<(), VerificationError> {
        let id = self.find_by_email(email)?.id;
        let (identity, token) = self.update(id, |identity| self.reissue(identity))?;
        self.notifier
            .notify(&identity, NotificationKind::LoginLink, &token);
        Ok(())
    }

    /// Follow a login link. The token stays valid afterwards.
    pub fn login_by_email(&self, email: &str, token: &str) -> Result<Principal, VerificationError> {
        let identity = self.find_by_email(email)?;
        self.auth.by_token(&identity, token)
    }

    /// Look an identity up by email first, then by nickname.
    pub fn find_for_login(&self, login: &str) -> Result<Identity, VerificationError> {
        if let Some(identity) = self.store.find_by_email(login)? {
            return Ok(identity);
        }
        self.store
            .find_by_nickname(login)?
            .ok_or_else(|| VerificationError::NotFound(login.to_string()))
    }

    /// Password login. `password_matches` is given the stored hash and
    /// decides whether the presented password fits it.
    pub fn login_with_password(
        &self,
        login: &str,
        password_matches: impl FnOnce(&str) -> bool,
    ) -> Result<Principal, VerificationError> {
        let identity = match self.find_for_login(login) {
            Ok(identity) => identity,
            // Unknown logins are indistinguishable from wrong passwords.
            Err(VerificationError::NotFound(_)) => return Err(VerificationError::BadCredentials),
            Err(e) => return Err(e),
        };
        let matched = password_matches(&identity.password_hash);
        self.auth.by_password(&identity, matched)
    }

    // ── Settings ────────────────────────────────────────────────────────

    pub fn update_profile(
        &self,
        caller: &Principal,
        update: ProfileUpdate,
    ) -> Result<Identity, VerificationError> {
        if let Some(field) = update.first_oversized_field() {
            return Err(VerificationError::InvalidProfile(field));
        }
        let (identity, ()) = self.update(caller.identity_id, |identity| {
            update.clone().apply(identity);
            Ok(())
        })?;
        Ok(identity)
    }

    pub fn update_notifications(
        &self,
        caller: &Principal,
        settings: NotificationSettings,
    ) -> Result<Identity, VerificationError> {
        let (identity, ()) = self.update(caller.identity_id, |identity| {
            settings.apply(identity);
            Ok(())
        })?;
        Ok(identity)
    }

    /// Replace the stored password hash (hashing happens outside the core).
    pub fn update_password(
        &self,
        caller: &Principal,
        password_hash: String,
    ) -> Result<(), VerificationError> {
        self.update(caller.identity_id, |identity| {
            identity.password_hash = password_hash.clone();
            Ok(())
        })?;
        tracing::info!(identity = %caller.identity_id, "password changed");
        Ok(())
    }

    /// Returns `false` if the identity already had the tag.
    pub fn add_tag(&self, caller: &Principal, tag: &str) -> Result<bool, VerificationError> {
        let (_, added) = self.update(caller.identity_id, |identity| {
            Ok(identity.tags.insert(tag.to_string()))
        })?;
        Ok(added)
    }

    /// Returns `false` if the identity did not have the tag.
    pub fn remove_tag(&self, caller: &Principal, tag: &str) -> Result<bool, VerificationError> {
        let (_, removed) =
            self.update(caller.identity_id, |identity| Ok(identity.tags.remove(tag)))?;
        Ok(removed)
    }

    pub fn add_zone(&self, caller: &Principal, zone: &str) -> Result<bool, VerificationError> {
        let (_, added) = self.update(caller.identity_id, |identity| {
            Ok(identity.zones.insert(zone.to_string()))
        })?;
        Ok(added)
    }

    pub fn remove_zone(&self, caller: &Principal, zone: &str) -> Result<bool, VerificationError> {
        let (_, removed) =
            self.update(caller.identity_id, |identity| Ok(identity.zones.remove(zone)))?;
        Ok(removed)
    }

    /// Change the nickname and hand back a principal that reflects it.
    pub fn update_nickname(
        &self,
        caller: &Principal,
        nickname: &str,
    ) -> Result<Principal, VerificationError> {
        if let Some(other) = self.store.find_by_nickname(nickname)? {
            if other.id != caller.identity_id {
                return Err(VerificationError::NicknameTaken(nickname.to_string()));
            }
        }
        let result = self.update(caller.identity_id, |identity| {
            identity.nickname = nickname.to_string();
            Ok(())
        });
        let (identity, ()) = match result {
            Err(VerificationError::Store(StoreError::Duplicate(_))) => {
                return Err(VerificationError::NicknameTaken(nickname.to_string()))
            }
            other => other?,
        };
        self.auth.refresh(&identity, caller)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn find_by_email(&self, email: &str) -> Result<Identity, VerificationError> {
        self.store
            .find_by_email(email)?
            .ok_or_else(|| VerificationError::NotFound(email.to_string()))
    }

    fn load(&self, id: IdentityId) -> Result<Identity, VerificationError> {
        match self.store.get_identity(id) {
            Ok(identity) => Ok(identity),
            Err(StoreError::NotFound(_)) => Err(VerificationError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Cool-down gate followed by a fresh token.
    fn reissue(&self, identity: &mut Identity) -> Result<VerificationToken, VerificationError> {
        if !self.issuer.can_reissue(identity) {
            let retry_after_secs = self.issuer.retry_after(identity);
            tracing::info!(
                identity = %identity.id,
                retry_after = %format_duration(retry_after_secs),
                "token resend refused during cool-down"
            );
            return Err(VerificationError::RateLimited { retry_after_secs });
        }
        self.issuer.issue(identity)
    }

    /// Load, apply `change`, save. One retry on a version conflict.
    fn update<T>(
        &self,
        id: IdentityId,
        mut change: impl FnMut(&mut Identity) -> Result<T, VerificationError>,
    ) -> Result<(Identity, T), VerificationError> {
        let mut retried = false;
        loop {
            let mut identity = self.load(id)?;
            let out = change(&mut identity)?;
            match self.store.put_identity(&identity) {
                Ok(version) => {
                    identity.version = version;
                    return Ok((identity, out));
                }
                Err(e) if e.is_conflict() && !retried => {
                    tracing::debug!(identity = %id, "identity save conflicted, retrying");
                    retried = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
