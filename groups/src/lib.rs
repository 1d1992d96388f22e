//! Groups — the publish/close lifecycle, recruiting, and manager/member sets.
//!
//! A group starts as a draft managed by its creator, is published at most
//! once and closed at most once. While published its recruiting flag may be
//! toggled, no more than once per cool-down window. Outsiders can join only
//! while it is published and recruiting.

pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod service;

pub use error::GroupError;
pub use lifecycle::{GroupLifecycle, LifecycleOp};
pub use registry::MembershipRegistry;
pub use service::GroupService;
