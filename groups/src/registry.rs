//! Membership registry — the manager and member sets of a group.
//!
//! Operates on a fully loaded [`Group`]; both sets are always present, so a
//! predicate never answers from a partial view.

use crate::error::GroupError;
use cohort_types::{Group, IdentityId};

pub struct MembershipRegistry;

impl MembershipRegistry {
    /// Add a manager. Returns `false` if already a manager.
    pub fn add_manager(&self, group: &mut Group, identity: IdentityId) -> bool {
        group.managers.insert(identity)
    }

    /// Add a member. Returns `false` if already a member; the member count
    /// only moves on actual insertion.
    pub fn add_member(&self, group: &mut Group, identity: IdentityId) -> bool {
        let inserted = group.members.insert(identity);
        if inserted {
            group.member_count += 1;
        }
        inserted
    }

    /// Remove a member. Returns `false` if not a member; the member count
    /// only moves on actual removal.
    pub fn remove_member(&self, group: &mut Group, identity: IdentityId) -> bool {
        let removed = group.members.remove(&identity);
        if removed {
            group.member_count = group.member_count.saturating_sub(1);
        }
        removed
    }

    pub fn is_manager(&self, group: &Group, identity: IdentityId) -> bool {
        group.managers.contains(&identity)
    }

    pub fn is_member(&self, group: &Group, identity: IdentityId) -> bool {
        group.members.contains(&identity)
    }

    /// Published, recruiting, and `identity` is neither a member nor a manager.
    pub fn is_joinable(&self, group: &Group, identity: IdentityId) -> bool {
        group.published
            && group.recruiting
            && !self.is_member(group, identity)
            && !self.is_manager(group, identity)
    }

    pub fn ensure_manager(&self, group: &Group, caller: IdentityId) -> Result<(), GroupError> {
        if self.is_manager(group, caller) {
            Ok(())
        } else {
            Err(GroupError::NotAuthorized {
                caller,
                group: group.path.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_types::{GroupPath, NewGroup};

    const NOBODY: IdentityId = IdentityId::UNASSIGNED;

    fn id(n: u64) -> IdentityId {
        IdentityId::new(n)
    }

    fn group() -> Group {
        NewGroup {
            path: GroupPath::parse("rust").unwrap(),
            title: "Rust".into(),
            short_description: String::new(),
            full_description: String::new(),
        }
        .into_group(id(1))
    }

    fn recruiting_group() -> Group {
        let mut g = group();
        g.published = true;
        g.recruiting = true;
        g
    }

    #[test]
    fn add_member_is_idempotent() {
        let registry = MembershipRegistry;
        let mut g = group();
        assert!(registry.add_member(&mut g, id(2)));
        assert!(!registry.add_member(&mut g, id(2)));
        assert_eq!(g.member_count, 1);
        assert!(registry.is_member(&g, id(2)));
    }

    #[test]
    fn double_removal_decrements_once() {
        let registry = MembershipRegistry;
        let mut g = group();
        registry.add_member(&mut g, id(2));
        registry.add_member(&mut g, id(3));

        assert!(registry.remove_member(&mut g, id(2)));
        assert!(!registry.remove_member(&mut g, id(2)));
        assert_eq!(g.member_count, 1);
        assert_eq!(g.member_count as usize, g.members.len());
    }

    #[test]
    fn removing_absent_member_from_empty_group_keeps_zero() {
        let registry = MembershipRegistry;
        let mut g = group();
        assert!(!registry.remove_member(&mut g, id(9)));
        assert_eq!(g.member_count, 0);
    }

    #[test]
    fn add_manager_is_idempotent() {
        let registry = MembershipRegistry;
        let mut g = group();
        assert!(!registry.add_manager(&mut g, id(1)));
        assert!(registry.add_manager(&mut g, id(4)));
        assert!(registry.is_manager(&g, id(4)));
        assert_eq!(g.managers.len(), 2);
    }

    #[test]
    fn joinable_only_for_outsiders_of_recruiting_groups() {
        let registry = MembershipRegistry;
        let mut g = recruiting_group();
        registry.add_member(&mut g, id(2));

        assert!(registry.is_joinable(&g, id(3)));
        assert!(!registry.is_joinable(&g, id(2)));
        assert!(!registry.is_joinable(&g, id(1)));

        g.recruiting = false;
        assert!(!registry.is_joinable(&g, id(3)));

        let mut draft = group();
        draft.recruiting = true;
        assert!(!registry.is_joinable(&draft, id(3)));
    }

    #[test]
    fn ensure_manager_rejects_members() {
        let registry = MembershipRegistry;
        let mut g = group();
        registry.add_member(&mut g, id(2));
        assert!(registry.ensure_manager(&g, id(1)).is_ok());
        assert!(matches!(
            registry.ensure_manager(&g, id(2)),
            Err(GroupError::NotAuthorized { .. })
        ));
        assert!(registry.ensure_manager(&g, NOBODY).is_err());
    }
}
