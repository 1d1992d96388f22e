//! Registered identities (accounts) and the DTOs that are allowed to change them.

use crate::{IdentityId, Timestamp, VerificationToken};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The verification token currently outstanding for an identity.
///
/// Token and issue time live in one value so they are always set or
/// cleared together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: VerificationToken,
    pub issued_at: Timestamp,
}

/// Free-form profile fields shown on an identity's public page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
}

/// Per-channel notification preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub group_created_by_email: bool,
    pub group_created_by_web: bool,
    pub group_enrollment_result_by_email: bool,
    pub group_enrollment_result_by_web: bool,
    pub group_updated_by_email: bool,
    pub group_updated_by_web: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            group_created_by_email: false,
            group_created_by_web: true,
            group_enrollment_result_by_email: false,
            group_enrollment_result_by_web: true,
            group_updated_by_email: false,
            group_updated_by_web: true,
        }
    }
}

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub nickname: String,
    /// Opaque hash produced by the excluded password hasher.
    pub password_hash: String,
    pub verified: bool,
    pub verified_at: Option<Timestamp>,
    pub token: Option<IssuedToken>,
    pub profile: Profile,
    pub notifications: NotificationPrefs,
    /// Interest tags, used to match the identity with groups.
    pub tags: BTreeSet<String>,
    /// Zones the identity is active in.
    pub zones: BTreeSet<String>,
    /// Optimistic-concurrency version, bumped by the store on every save.
    pub version: u64,
}

impl Identity {
    pub fn verification_token(&self) -> Option<&VerificationToken> {
        self.token.as_ref().map(|t| &t.token)
    }

    pub fn token_issued_at(&self) -> Option<Timestamp> {
        self.token.as_ref().map(|t| t.issued_at)
    }
}

/// Sign-up data accepted by registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewIdentity {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}

impl NewIdentity {
    /// Build an unverified identity with no token, no tags or zones, and
    /// default profile and notification preferences.
    pub fn into_identity(self) -> Identity {
        Identity {
            id: IdentityId::UNASSIGNED,
            email: self.email,
            nickname: self.nickname,
            password_hash: self.password_hash,
            verified: false,
            verified_at: None,
            token: None,
            profile: Profile::default(),
            notifications: NotificationPrefs::default(),
            tags: BTreeSet::new(),
            zones: BTreeSet::new(),
            version: 0,
        }
    }
}

/// Profile edit form.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    /// Length limits per field, in characters.
    pub const MAX_BIO_LEN: usize = 35;
    pub const MAX_FIELD_LEN: usize = 50;

    /// Returns the name of the first field exceeding its length limit.
    pub fn first_oversized_field(&self) -> Option<&'static str> {
        let too_long = |v: &Option<String>, max: usize| {
            v.as_deref().is_some_and(|s| s.chars().count() > max)
        };
        if too_long(&self.bio, Self::MAX_BIO_LEN) {
            Some("bio")
        } else if too_long(&self.url, Self::MAX_FIELD_LEN) {
            Some("url")
        } else if too_long(&self.occupation, Self::MAX_FIELD_LEN) {
            Some("occupation")
        } else if too_long(&self.location, Self::MAX_FIELD_LEN) {
            Some("location")
        } else {
            None
        }
    }

    /// Copy every profile field onto `identity`. Nothing else is touched.
    pub fn apply(self, identity: &mut Identity) {
        identity.profile = Profile {
            bio: self.bio,
            url: self.url,
            occupation: self.occupation,
            location: self.location,
            profile_image: self.profile_image,
        };
    }
}

/// Notification settings form.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub group_created_by_email: bool,
    pub group_created_by_web: bool,
    pub group_enrollment_result_by_email: bool,
    pub group_enrollment_result_by_web: bool,
    pub group_updated_by_email: bool,
    pub group_updated_by_web: bool,
}

impl NotificationSettings {
    pub fn apply(self, identity: &mut Identity) {
        identity.notifications = NotificationPrefs {
            group_created_by_email: self.group_created_by_email,
            group_created_by_web: self.group_created_by_web,
            group_enrollment_result_by_email: self.group_enrollment_result_by_email,
            group_enrollment_result_by_web: self.group_enrollment_result_by_web,
            group_updated_by_email: self.group_updated_by_email,
            group_updated_by_web: self.group_updated_by_web,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identity {
        NewIdentity {
            email: "ann@example.com".into(),
            nickname: "ann".into(),
            password_hash: "hash".into(),
        }
        .into_identity()
    }

    #[test]
    fn new_identity_starts_unverified_without_token() {
        let identity = sample();
        assert!(!identity.verified);
        assert!(identity.verified_at.is_none());
        assert!(identity.verification_token().is_none());
        assert!(identity.token_issued_at().is_none());
        assert!(identity.notifications.group_created_by_web);
        assert!(!identity.notifications.group_created_by_email);
        assert!(identity.tags.is_empty() && identity.zones.is_empty());
    }

    #[test]
    fn profile_update_leaves_credentials_alone() {
        let mut identity = sample();
        identity.id = IdentityId::new(7);
        ProfileUpdate {
            bio: Some("hello".into()),
            location: Some("Seoul".into()),
            ..Default::default()
        }
        .apply(&mut identity);
        assert_eq!(identity.profile.bio.as_deref(), Some("hello"));
        assert_eq!(identity.profile.location.as_deref(), Some("Seoul"));
        assert_eq!(identity.id, IdentityId::new(7));
        assert_eq!(identity.email, "ann@example.com");
        assert_eq!(identity.password_hash, "hash");
    }

    #[test]
    fn oversized_bio_is_reported() {
        let update = ProfileUpdate {
            bio: Some("x".repeat(36)),
            ..Default::default()
        };
        assert_eq!(update.first_oversized_field(), Some("bio"));
        assert_eq!(ProfileUpdate::default().first_oversized_field(), None);
    }
}
