//! Group service — creation, manager-facing edits, lifecycle transitions and
//! membership over a [`GroupStore`].

use crate::error::GroupError;
use crate::lifecycle::GroupLifecycle;
use crate::registry::MembershipRegistry;
use cohort_store::{GroupStore, StoreError};
use cohort_types::{
    Clock, CohortParams, DescriptionUpdate, Group, GroupId, GroupPath, IdentityId, NewGroup,
};
use cohort_verification::Principal;
use std::sync::Arc;

/// Drives groups through their lifecycle on behalf of authenticated callers.
///
/// Mutations load the group, check the caller and the transition guard,
/// apply the change and save it version checked. A save that loses a race
/// is retried once against freshly loaded state with every guard re-run; a
/// second conflict is returned as a store error.
pub struct GroupService {
    store: Arc<dyn GroupStore>,
    lifecycle: GroupLifecycle,
    registry: MembershipRegistry,
    max_title_len: usize,
}

impl GroupService {
    pub fn new(store: Arc<dyn GroupStore>, clock: Arc<dyn Clock>, params: &CohortParams) -> Self {
        Self {
            store,
            lifecycle: GroupLifecycle::new(clock, params),
            registry: MembershipRegistry,
            max_title_len: params.max_title_len,
        }
    }

    pub fn lifecycle(&self) -> &GroupLifecycle {
        &self.lifecycle
    }

    pub fn registry(&self) -> &MembershipRegistry {
        &self.registry
    }

    // ── Creation and lookup ─────────────────────────────────────────────

    /// Create a draft group managed by `creator`.
    pub fn create(&self, creator: &Principal, new: NewGroup) -> Result<Group, GroupError> {
        if !self.is_valid_title(&new.title) {
            return Err(GroupError::InvalidTitle(new.title));
        }
        if self.store.path_exists(&new.path)? {
            return Err(GroupError::PathTaken(new.path.to_string()));
        }
        let path = new.path.clone();
        let group = match self.store.insert_group(new.into_group(creator.identity_id)) {
            Ok(group) => group,
            Err(StoreError::Duplicate(_)) => return Err(GroupError::PathTaken(path.to_string())),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(group = %group.path, manager = %creator.identity_id, "group created");
        Ok(group)
    }

    pub fn get(&self, path: &GroupPath) -> Result<Group, GroupError> {
        self.store
            .find_by_path(path)?
            .ok_or_else(|| GroupError::NotFound(path.to_string()))
    }

    /// Load a group for editing; only its managers may.
    pub fn get_to_update(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let group = self.get(path)?;
        self.registry.ensure_manager(&group, caller.identity_id)?;
        Ok(group)
    }

    /// A well-formed path that no group uses yet.
    pub fn is_valid_path(&self, raw: &str) -> Result<bool, GroupError> {
        match GroupPath::parse(raw) {
            Some(path) => Ok(!self.store.path_exists(&path)?),
            None => Ok(false),
        }
    }

    pub fn is_valid_title(&self, title: &str) -> bool {
        !title.trim().is_empty() && title.chars().count() <= self.max_title_len
    }

    // ── Manager-facing edits ────────────────────────────────────────────

    pub fn update_description(
        &self,
        caller: &Principal,
        path: &GroupPath,
        update: DescriptionUpdate,
    ) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| {
            update.clone().apply(group);
            Ok(())
        })?;
        Ok(group)
    }

    pub fn update_image(
        &self,
        caller: &Principal,
        path: &GroupPath,
        image: &str,
    ) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| {
            group.image = Some(image.to_string());
            Ok(())
        })?;
        Ok(group)
    }

    pub fn enable_banner(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        self.set_banner(caller, path, true)
    }

    pub fn disable_banner(
        &self,
        caller: &Principal,
        path: &GroupPath,
    ) -> Result<Group, GroupError> {
        self.set_banner(caller, path, false)
    }

    /// Returns `false` if the tag was already present.
    pub fn add_tag(
        &self,
        caller: &Principal,
        path: &GroupPath,
        tag: &str,
    ) -> Result<bool, GroupError> {
        let (_, added) =
            self.manage(caller, path, |group| Ok(group.tags.insert(tag.to_string())))?;
        Ok(added)
    }

    /// Returns `false` if the tag was not present.
    pub fn remove_tag(
        &self,
        caller: &Principal,
        path: &GroupPath,
        tag: &str,
    ) -> Result<bool, GroupError> {
        let (_, removed) = self.manage(caller, path, |group| Ok(group.tags.remove(tag)))?;
        Ok(removed)
    }

    pub fn add_zone(
        &self,
        caller: &Principal,
        path: &GroupPath,
        zone: &str,
    ) -> Result<bool, GroupError> {
        let (_, added) =
            self.manage(caller, path, |group| Ok(group.zones.insert(zone.to_string())))?;
        Ok(added)
    }

    pub fn remove_zone(
        &self,
        caller: &Principal,
        path: &GroupPath,
        zone: &str,
    ) -> Result<bool, GroupError> {
        let (_, removed) = self.manage(caller, path, |group| Ok(group.zones.remove(zone)))?;
        Ok(removed)
    }

    /// Move the group to a new path. The old path stops resolving.
    pub fn update_path(
        &self,
        caller: &Principal,
        path: &GroupPath,
        new_path: &str,
    ) -> Result<Group, GroupError> {
        let new_path = GroupPath::parse(new_path)
            .ok_or_else(|| GroupError::InvalidPath(new_path.to_string()))?;
        if &new_path != path && self.store.path_exists(&new_path)? {
            return Err(GroupError::PathTaken(new_path.to_string()));
        }
        let result = self.manage(caller, path, |group| {
            group.path = new_path.clone();
            Ok(())
        });
        let (group, ()) = match result {
            Err(GroupError::Store(StoreError::Duplicate(_))) => {
                return Err(GroupError::PathTaken(new_path.to_string()))
            }
            other => other?,
        };
        tracing::info!(from = %path, to = %group.path, "group path changed");
        Ok(group)
    }

    pub fn update_title(
        &self,
        caller: &Principal,
        path: &GroupPath,
        title: &str,
    ) -> Result<Group, GroupError> {
        if !self.is_valid_title(title) {
            return Err(GroupError::InvalidTitle(title.to_string()));
        }
        let (group, ()) = self.manage(caller, path, |group| {
            group.title = title.to_string();
            Ok(())
        })?;
        Ok(group)
    }

    /// Returns `false` if `identity` already manages the group.
    pub fn add_manager(
        &self,
        caller: &Principal,
        path: &GroupPath,
        identity: IdentityId,
    ) -> Result<bool, GroupError> {
        let (_, added) = self.manage(caller, path, |group| {
            Ok(self.registry.add_manager(group, identity))
        })?;
        Ok(added)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    pub fn publish(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| self.lifecycle.publish(group))?;
        tracing::info!(group = %group.path, "group published");
        Ok(group)
    }

    pub fn close(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| self.lifecycle.close(group))?;
        tracing::info!(group = %group.path, "group closed");
        Ok(group)
    }

    pub fn start_recruit(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| self.lifecycle.start_recruit(group))?;
        tracing::info!(group = %group.path, "recruiting started");
        Ok(group)
    }

    pub fn stop_recruit(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| self.lifecycle.stop_recruit(group))?;
        tracing::info!(group = %group.path, "recruiting stopped");
        Ok(group)
    }

    /// Delete a draft group. Published groups are never removed.
    pub fn remove(&self, caller: &Principal, path: &GroupPath) -> Result<(), GroupError> {
        let mut group = self.get(path)?;
        let mut retried = false;
        loop {
            self.registry.ensure_manager(&group, caller.identity_id)?;
            self.lifecycle.check_removable(&group)?;
            match self.store.delete_group(&group) {
                Ok(()) => {
                    tracing::info!(group = %group.path, "group removed");
                    return Ok(());
                }
                Err(e) if e.is_conflict() && !retried => {
                    tracing::debug!(group = %group.id, "group delete conflicted, retrying");
                    retried = true;
                    group = self.load(group.id)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Join a published, recruiting group the caller is not yet part of.
    /// Closed groups take no new members.
    pub fn join(&self, caller: &Principal, path: &GroupPath) -> Result<Group, GroupError> {
        let (group, ()) = self.mutate(path, |group| {
            if group.closed || !self.registry.is_joinable(group, caller.identity_id) {
                return Err(GroupError::NotJoinable(group.path.to_string()));
            }
            self.registry.add_member(group, caller.identity_id);
            Ok(())
        })?;
        tracing::info!(group = %group.path, member = %caller.identity_id, "member joined");
        Ok(group)
    }

    /// Leave a group. Returns `false` if the caller was not a member.
    pub fn leave(&self, caller: &Principal, path: &GroupPath) -> Result<bool, GroupError> {
        let (group, removed) = self.mutate(path, |group| {
            Ok(self.registry.remove_member(group, caller.identity_id))
        })?;
        if removed {
            tracing::info!(group = %group.path, member = %caller.identity_id, "member left");
        }
        Ok(removed)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn set_banner(
        &self,
        caller: &Principal,
        path: &GroupPath,
        use_banner: bool,
    ) -> Result<Group, GroupError> {
        let (group, ()) = self.manage(caller, path, |group| {
            group.use_banner = use_banner;
            Ok(())
        })?;
        Ok(group)
    }

    fn load(&self, id: GroupId) -> Result<Group, GroupError> {
        match self.store.get_group(id) {
            Ok(group) => Ok(group),
            Err(StoreError::NotFound(_)) => Err(GroupError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// [`Self::mutate`] restricted to the group's managers.
    fn manage<T>(
        &self,
        caller: &Principal,
        path: &GroupPath,
        mut change: impl FnMut(&mut Group) -> Result<T, GroupError>,
    ) -> Result<(Group, T), GroupError> {
        self.mutate(path, |group| {
            self.registry.ensure_manager(group, caller.identity_id)?;
            change(group)
        })
    }

    /// Load by path, apply `change`, save. The retry reloads by id so a
    /// concurrent path change does not turn a conflict into `NotFound`.
    fn mutate<T>(
        &self,
        path: &GroupPath,
        mut change: impl FnMut(&mut Group) -> Result<T, GroupError>,
    ) -> Result<(Group, T), GroupError> {
        let mut group = self.get(path)?;
        let mut retried = false;
        loop {
            let out = change(&mut group)?;
            match self.store.put_group(&group) {
                Ok(version) => {
                    group.version = version;
                    return Ok((group, out));
                }
                Err(e) if e.is_conflict() && !retried => {
                    tracing::debug!(group = %group.id, "group save conflicted, retrying");
                    retried = true;
                    group = self.load(group.id)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_nullables::{NullClock, NullStore};
    use cohort_types::Timestamp;
    use cohort_verification::AuthMethod;

    fn principal(id: u64) -> Principal {
        Principal {
            identity_id: IdentityId::new(id),
            nickname: format!("user{id}"),
            email: format!("user{id}@example.com"),
            verified: true,
            method: AuthMethod::Password,
            authenticated_at: Timestamp::EPOCH,
        }
    }

    fn service() -> (Arc<NullStore>, GroupService) {
        let store = Arc::new(NullStore::new());
        let service = GroupService::new(
            store.clone(),
            Arc::new(NullClock::new(1_000)),
            &CohortParams::default(),
        );
        (store, service)
    }

    fn new_group(path: &str, title: &str) -> NewGroup {
        NewGroup {
            path: GroupPath::parse(path).unwrap(),
            title: title.to_string(),
            short_description: "short".into(),
            full_description: "full".into(),
        }
    }

    #[test]
    fn titles_are_bounded() {
        let (_store, service) = service();
        assert!(service.is_valid_title("Rust"));
        assert!(service.is_valid_title(&"가".repeat(50)));
        assert!(!service.is_valid_title(&"a".repeat(51)));
        assert!(!service.is_valid_title("   "));
        assert!(matches!(
            service.create(&principal(1), new_group("rust", "")),
            Err(GroupError::InvalidTitle(_))
        ));
    }

    #[test]
    fn paths_must_be_well_formed_and_free() {
        let (_store, service) = service();
        service.create(&principal(1), new_group("rust", "Rust")).unwrap();
        assert!(!service.is_valid_path("rust").unwrap());
        assert!(!service.is_valid_path("Rust").unwrap());
        assert!(!service.is_valid_path("x").unwrap());
        assert!(service.is_valid_path("rust-2").unwrap());
        assert!(matches!(
            service.create(&principal(2), new_group("rust", "Other")),
            Err(GroupError::PathTaken(_))
        ));
    }

    #[test]
    fn manager_only_edits() {
        let (_store, service) = service();
        let path = service.create(&principal(1), new_group("rust", "Rust")).unwrap().path;

        assert!(matches!(
            service.get_to_update(&principal(2), &path),
            Err(GroupError::NotAuthorized { .. })
        ));
        assert!(matches!(
            service.update_image(&principal(2), &path, "img.png"),
            Err(GroupError::NotAuthorized { .. })
        ));

        let group = service.update_image(&principal(1), &path, "img.png").unwrap();
        assert_eq!(group.image.as_deref(), Some("img.png"));
        assert!(service.enable_banner(&principal(1), &path).unwrap().use_banner);
        assert!(!service.disable_banner(&principal(1), &path).unwrap().use_banner);
    }

    #[test]
    fn tags_and_zones_report_changes() {
        let (_store, service) = service();
        let owner = principal(1);
        let path = service.create(&owner, new_group("rust", "Rust")).unwrap().path;

        assert!(service.add_tag(&owner, &path, "systems").unwrap());
        assert!(!service.add_tag(&owner, &path, "systems").unwrap());
        assert!(service.remove_tag(&owner, &path, "systems").unwrap());
        assert!(!service.remove_tag(&owner, &path, "systems").unwrap());

        assert!(service.add_zone(&owner, &path, "Seoul").unwrap());
        assert!(service.get(&path).unwrap().zones.contains("Seoul"));
        assert!(service.remove_zone(&owner, &path, "Seoul").unwrap());
    }

    #[test]
    fn path_change_moves_the_group() {
        let (_store, service) = service();
        let owner = principal(1);
        let path = service.create(&owner, new_group("rust", "Rust")).unwrap().path;
        service.create(&owner, new_group("go", "Go")).unwrap();

        assert!(matches!(
            service.update_path(&owner, &path, "Not Valid"),
            Err(GroupError::InvalidPath(_))
        ));
        assert!(matches!(
            service.update_path(&owner, &path, "go"),
            Err(GroupError::PathTaken(_))
        ));

        let moved = service.update_path(&owner, &path, "rust-lang").unwrap();
        assert_eq!(moved.path.as_str(), "rust-lang");
        assert!(matches!(service.get(&path), Err(GroupError::NotFound(_))));
    }

    #[test]
    fn conflicts_retry_once() {
        let (store, service) = service();
        let owner = principal(1);
        let path = service.create(&owner, new_group("rust", "Rust")).unwrap().path;

        store.inject_group_conflicts(1);
        service.publish(&owner, &path).unwrap();

        store.inject_group_conflicts(2);
        let err = service.close(&owner, &path).unwrap_err();
        assert!(matches!(err, GroupError::Store(ref e) if e.is_conflict()));
        assert!(!service.get(&path).unwrap().closed);
    }
}
