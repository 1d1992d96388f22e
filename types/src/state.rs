//! Lifecycle states of a group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a group is in its publish/close lifecycle.
///
/// Recruiting is an orthogonal flag that only has meaning while `Published`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupState {
    /// Created but not yet visible. The only state from which a group can be removed.
    Draft,
    /// Visible; recruiting may be toggled.
    Published,
    /// Terminal.
    Closed,
}

impl GroupState {
    pub fn can_publish(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn can_close(&self) -> bool {
        matches!(self, Self::Published)
    }

    pub fn can_toggle_recruiting(&self) -> bool {
        matches!(self, Self::Published)
    }

    pub fn is_removable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}
