//! Identity storage trait.

use crate::StoreError;
use cohort_types::{Identity, IdentityId};

/// Trait for identity storage operations.
///
/// `email` and `nickname` are unique keys. Saves are version checked: a save
/// whose `version` differs from the stored one fails with
/// [`StoreError::Conflict`].
pub trait IdentityStore: Send + Sync {
    fn get_identity(&self, id: IdentityId) -> Result<Identity, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;
    fn find_by_nickname(&self, nickname: &str) -> Result<Option<Identity>, StoreError>;

    /// Insert a new identity, assigning its id. Fails with
    /// [`StoreError::Duplicate`] if the email or nickname is taken.
    fn insert_identity(&self, identity: Identity) -> Result<Identity, StoreError>;

    /// Persist changes to an existing identity. Returns the new version.
    fn put_identity(&self, identity: &Identity) -> Result<u64, StoreError>;

    fn identity_count(&self) -> Result<u64, StoreError>;

    fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.find_by_email(email).map(|i| i.is_some())
    }

    fn nickname_exists(&self, nickname: &str) -> Result<bool, StoreError> {
        self.find_by_nickname(nickname).map(|i| i.is_some())
    }
}
