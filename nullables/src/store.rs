//! Nullable store — thread-safe in-memory storage for testing.

use cohort_store::{GroupStore, IdentityStore, StoreError};
use cohort_types::{Group, GroupId, GroupPath, Identity, IdentityId};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    identities: BTreeMap<IdentityId, Identity>,
    groups: BTreeMap<GroupId, Group>,
    next_identity: u64,
    next_group: u64,
    /// Number of upcoming group saves/deletes to fail with a conflict.
    injected_group_conflicts: u32,
    injected_identity_conflicts: u32,
}

/// An in-memory identity + group store for testing.
///
/// One lock guards every table, so unique-key checks and version checks are
/// atomic with the write they protect. Loads hand out copies; changes are
/// only visible after a successful save.
pub struct NullStore {
    tables: Mutex<Tables>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Make the next `n` group saves or deletes fail with
    /// [`StoreError::Conflict`], as if another writer got there first.
    pub fn inject_group_conflicts(&self, n: u32) {
        self.tables.lock().unwrap().injected_group_conflicts = n;
    }

    /// Make the next `n` identity saves fail with [`StoreError::Conflict`].
    pub fn inject_identity_conflicts(&self, n: u32) {
        self.tables.lock().unwrap().injected_identity_conflicts = n;
    }

    pub fn group_count(&self) -> usize {
        self.tables.lock().unwrap().groups.len()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_version(key: String, expected: u64, found: u64) -> Result<(), StoreError> {
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::Conflict {
            key,
            expected,
            found,
        })
    }
}

fn take_injected(counter: &mut u32, key: String, version: u64) -> Result<(), StoreError> {
    if *counter > 0 {
        *counter -= 1;
        return Err(StoreError::Conflict {
            key,
            expected: version,
            found: version + 1,
        });
    }
    Ok(())
}

impl IdentityStore for NullStore {
    fn get_identity(&self, id: IdentityId) -> Result<Identity, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .identities
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .identities
            .values()
            .find(|i| i.email == email)
            .cloned())
    }

    fn find_by_nickname(&self, nickname: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .identities
            .values()
            .find(|i| i.nickname == nickname)
            .cloned())
    }

    fn insert_identity(&self, mut identity: Identity) -> Result<Identity, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.identities.values().any(|i| i.email == identity.email) {
            return Err(StoreError::Duplicate(format!("email {}", identity.email)));
        }
        if tables
            .identities
            .values()
            .any(|i| i.nickname == identity.nickname)
        {
            return Err(StoreError::Duplicate(format!("nickname {}", identity.nickname)));
        }
        tables.next_identity += 1;
        identity.id = IdentityId::new(tables.next_identity);
        identity.version = 1;
        tables.identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    fn put_identity(&self, identity: &Identity) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let key = identity.id.to_string();
        let stored = tables
            .identities
            .get(&identity.id)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        check_version(key.clone(), identity.version, stored.version)?;
        let nickname_taken = tables
            .identities
            .values()
            .any(|i| i.id != identity.id && i.nickname == identity.nickname);
        if nickname_taken {
            return Err(StoreError::Duplicate(format!("nickname {}", identity.nickname)));
        }
        take_injected(&mut tables.injected_identity_conflicts, key, identity.version)?;

        let mut saved = identity.clone();
        saved.version += 1;
        let version = saved.version;
        tables.identities.insert(saved.id, saved);
        Ok(version)
    }

    fn identity_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().identities.len() as u64)
    }
}

impl GroupStore for NullStore {
    fn get_group(&self, id: GroupId) -> Result<Group, StoreError> {
        self.tables
            .lock()
            .unwrap()
            .groups
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn find_by_path(&self, path: &GroupPath) -> Result<Option<Group>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .groups
            .values()
            .find(|g| &g.path == path)
            .cloned())
    }

    fn insert_group(&self, mut group: Group) -> Result<Group, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.groups.values().any(|g| g.path == group.path) {
            return Err(StoreError::Duplicate(format!("path {}", group.path)));
        }
        tables.next_group += 1;
        group.id = GroupId::new(tables.next_group);
        group.version = 1;
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    fn put_group(&self, group: &Group) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let key = group.id.to_string();
        let stored = tables
            .groups
            .get(&group.id)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        check_version(key.clone(), group.version, stored.version)?;
        let path_taken = tables
            .groups
            .values()
            .any(|g| g.id != group.id && g.path == group.path);
        if path_taken {
            return Err(StoreError::Duplicate(format!("path {}", group.path)));
        }
        take_injected(&mut tables.injected_group_conflicts, key, group.version)?;

        let mut saved = group.clone();
        saved.version += 1;
        let version = saved.version;
        tables.groups.insert(saved.id, saved);
        Ok(version)
    }

    fn delete_group(&self, group: &Group) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let key = group.id.to_string();
        let stored = tables
            .groups
            .get(&group.id)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        check_version(key.clone(), group.version, stored.version)?;
        take_injected(&mut tables.injected_group_conflicts, key, group.version)?;
        tables.groups.remove(&group.id);
        Ok(())
    }
}
