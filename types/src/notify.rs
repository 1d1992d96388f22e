//! Outbound notification seam.
//!
//! The core decides *whether* to notify; delivery belongs to the implementor.

use crate::{Identity, VerificationToken};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Why a token is being sent to an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Confirm the email address given at sign-up.
    SignUpConfirmation,
    /// Passwordless login link.
    LoginLink,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignUpConfirmation => f.write_str("sign-up confirmation"),
            Self::LoginLink => f.write_str("login link"),
        }
    }
}

/// Fire-and-forget dispatch of a token to an identity's email address.
pub trait Notifier: Send + Sync {
    fn notify(&self, identity: &Identity, kind: NotificationKind, token: &VerificationToken);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, identity: &Identity, kind: NotificationKind, token: &VerificationToken) {
        (**self).notify(identity, kind, token)
    }
}
