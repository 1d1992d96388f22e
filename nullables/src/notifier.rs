//! Nullable notifier — records notifications instead of sending email.

use cohort_types::{Identity, IdentityId, NotificationKind, Notifier, VerificationToken};
use std::sync::Mutex;

/// One recorded `notify` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentNotification {
    pub identity: IdentityId,
    pub email: String,
    pub kind: NotificationKind,
    pub token: VerificationToken,
}

/// Collects every notification for later assertions.
#[derive(Default)]
pub struct NullNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<SentNotification> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, identity: &Identity, kind: NotificationKind, token: &VerificationToken) {
        self.sent.lock().unwrap().push(SentNotification {
            identity: identity.id,
            email: identity.email.clone(),
            kind,
            token: token.clone(),
        });
    }
}
