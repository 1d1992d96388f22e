//! Group lifecycle — the publish/close state machine and the rate-limited
//! recruiting flag.
//!
//! ```text
//! Draft ──publish──▶ Published ──close──▶ Closed
//!   │                   │
//!   remove              start/stop recruit (at most once per window)
//! ```
//!
//! Every transition checks its guard against the group as loaded and leaves
//! the group untouched on failure.

use crate::error::GroupError;
use cohort_types::{Clock, CohortParams, Group, Timestamp};
use std::fmt;
use std::sync::Arc;

/// A lifecycle operation, named in [`GroupError::InvalidTransition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleOp {
    Publish,
    Close,
    StartRecruit,
    StopRecruit,
    Remove,
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Publish => "publish",
            Self::Close => "close",
            Self::StartRecruit => "start recruiting in",
            Self::StopRecruit => "stop recruiting in",
            Self::Remove => "remove",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
pub struct GroupLifecycle {
    clock: Arc<dyn Clock>,
    recruiting_cooldown_secs: u64,
}

impl GroupLifecycle {
    pub fn new(clock: Arc<dyn Clock>, params: &CohortParams) -> Self {
        Self {
            clock,
            recruiting_cooldown_secs: params.recruiting_cooldown_secs,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn publish(&self, group: &mut Group) -> Result<(), GroupError> {
        let state = group.state();
        if !state.can_publish() || group.managers.is_empty() {
            return Err(GroupError::InvalidTransition {
                op: LifecycleOp::Publish,
                state,
            });
        }
        group.published = true;
        group.published_at = Some(self.now());
        Ok(())
    }

    /// Close a published group. The recruiting flag is frozen as it was.
    pub fn close(&self, group: &mut Group) -> Result<(), GroupError> {
        let state = group.state();
        if !state.can_close() {
            return Err(GroupError::InvalidTransition {
                op: LifecycleOp::Close,
                state,
            });
        }
        group.closed = true;
        group.closed_at = Some(self.now());
        Ok(())
    }

    pub fn start_recruit(&self, group: &mut Group) -> Result<(), GroupError> {
        self.set_recruiting(group, true, LifecycleOp::StartRecruit)
    }

    pub fn stop_recruit(&self, group: &mut Group) -> Result<(), GroupError> {
        self.set_recruiting(group, false, LifecycleOp::StopRecruit)
    }

    /// Published, and the recruiting flag was never toggled or last toggled
    /// strictly more than one window ago.
    pub fn recruiting_rate_ok(&self, group: &Group) -> bool {
        group.published
            && group
                .recruiting_updated_at
                .map_or(true, |at| {
                    at.is_older_than(self.recruiting_cooldown_secs, self.now())
                })
    }

    /// Whether a recruiting toggle would be accepted right now.
    pub fn can_update_recruiting(&self, group: &Group) -> bool {
        group.state().can_toggle_recruiting() && self.recruiting_rate_ok(group)
    }

    /// Seconds until the next recruiting toggle is allowed; 0 if allowed now.
    pub fn recruiting_retry_after(&self, group: &Group) -> u64 {
        group.recruiting_updated_at.map_or(0, |at| {
            at.remaining_in_window(self.recruiting_cooldown_secs, self.now())
        })
    }

    /// Only drafts can be removed.
    pub fn check_removable(&self, group: &Group) -> Result<(), GroupError> {
        let state = group.state();
        if state.is_removable() {
            Ok(())
        } else {
            Err(GroupError::InvalidTransition {
                op: LifecycleOp::Remove,
                state,
            })
        }
    }

    fn set_recruiting(
        &self,
        group: &mut Group,
        recruiting: bool,
        op: LifecycleOp,
    ) -> Result<(), GroupError> {
        let state = group.state();
        if !state.can_toggle_recruiting() {
            return Err(GroupError::InvalidTransition { op, state });
        }
        if !self.recruiting_rate_ok(group) {
            return Err(GroupError::RateLimited {
                retry_after_secs: self.recruiting_retry_after(group),
            });
        }
        group.recruiting = recruiting;
        group.recruiting_updated_at = Some(self.now());
        Ok(())
    }
}
