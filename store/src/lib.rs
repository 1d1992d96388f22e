//! Abstract storage traits for the cohort core.
//!
//! Every storage backend (a relational database, the in-memory store used in
//! tests) implements these traits. The rest of the codebase depends only on
//! the traits.
//!
//! Entities carry a `version`. Backends must reject a save whose version no
//! longer matches the stored one, which gives each entity read-modify-write
//! atomicity without holding locks across a request.

pub mod error;
pub mod group;
pub mod identity;

pub use error::StoreError;
pub use group::GroupStore;
pub use identity::IdentityStore;
