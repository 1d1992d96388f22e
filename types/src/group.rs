//! Groups (studies) and the DTOs that create or edit them.

use crate::{GroupId, GroupPath, GroupState, IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A community unit with managers and members.
///
/// Manager and member sets are always loaded in full together with the
/// group; there is no partially populated view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub path: GroupPath,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub image: Option<String>,
    pub use_banner: bool,
    pub tags: BTreeSet<String>,
    pub zones: BTreeSet<String>,
    pub managers: BTreeSet<IdentityId>,
    pub members: BTreeSet<IdentityId>,
    /// Maintained alongside `members`; equals `members.len()`.
    pub member_count: u32,
    pub published: bool,
    pub closed: bool,
    pub recruiting: bool,
    pub published_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub recruiting_updated_at: Option<Timestamp>,
    /// Optimistic-concurrency version, bumped by the store on every save.
    pub version: u64,
}

impl Group {
    /// Current lifecycle state derived from the `published`/`closed` flags.
    pub fn state(&self) -> GroupState {
        if self.closed {
            GroupState::Closed
        } else if self.published {
            GroupState::Published
        } else {
            GroupState::Draft
        }
    }
}

/// Data accepted when a group is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGroup {
    pub path: GroupPath,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
}

impl NewGroup {
    /// Build a draft group whose only manager is `creator`.
    pub fn into_group(self, creator: IdentityId) -> Group {
        Group {
            id: GroupId::UNASSIGNED,
            path: self.path,
            title: self.title,
            short_description: self.short_description,
            full_description: self.full_description,
            image: None,
            use_banner: false,
            tags: BTreeSet::new(),
            zones: BTreeSet::new(),
            managers: BTreeSet::from([creator]),
            members: BTreeSet::new(),
            member_count: 0,
            published: false,
            closed: false,
            recruiting: false,
            published_at: None,
            closed_at: None,
            recruiting_updated_at: None,
            version: 0,
        }
    }
}

/// Description edit form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescriptionUpdate {
    pub short_description: String,
    pub full_description: String,
}

impl DescriptionUpdate {
    /// Copy both description fields onto `group`. Nothing else is touched.
    pub fn apply(self, group: &mut Group) {
        group.short_description = self.short_description;
        group.full_description = self.full_description;
    }
}
