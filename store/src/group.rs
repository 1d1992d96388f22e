//! Group storage trait.

use crate::StoreError;
use cohort_types::{Group, GroupId, GroupPath};

/// Trait for group storage operations.
///
/// Every load returns the group with its full manager and member sets.
/// `path` is a unique key. Saves and deletes are version checked.
pub trait GroupStore: Send + Sync {
    fn get_group(&self, id: GroupId) -> Result<Group, StoreError>;
    fn find_by_path(&self, path: &GroupPath) -> Result<Option<Group>, StoreError>;

    /// Insert a new group, assigning its id. Fails with
    /// [`StoreError::Duplicate`] if the path is taken.
    fn insert_group(&self, group: Group) -> Result<Group, StoreError>;

    /// Persist changes to an existing group. Returns the new version.
    ///
    /// A changed `path` must not collide with another group's path.
    fn put_group(&self, group: &Group) -> Result<u64, StoreError>;

    /// Delete a group, provided it was not modified since `group` was loaded.
    fn delete_group(&self, group: &Group) -> Result<(), StoreError>;

    fn path_exists(&self, path: &GroupPath) -> Result<bool, StoreError> {
        self.find_by_path(path).map(|g| g.is_some())
    }
}
