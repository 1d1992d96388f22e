//! Fundamental types for the cohort core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! timestamps and the clock, identifiers, identities, groups, lifecycle states,
//! tokens, policy parameters and the notification seam.

pub mod group;
pub mod identity;
pub mod ids;
pub mod notify;
pub mod params;
pub mod path;
pub mod state;
pub mod time;
pub mod token;

pub use group::{DescriptionUpdate, Group, NewGroup};
pub use identity::{
    Identity, IssuedToken, NewIdentity, NotificationPrefs, NotificationSettings, Profile,
    ProfileUpdate,
};
pub use ids::{GroupId, IdentityId};
pub use notify::{NotificationKind, Notifier};
pub use params::CohortParams;
pub use path::{GroupPath, InvalidGroupPath};
pub use state::GroupState;
pub use time::{Clock, SystemClock, Timestamp};
pub use token::{OsTokenSource, TokenSource, TokenSourceError, VerificationToken};
