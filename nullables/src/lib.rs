//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the core (clock, storage, notification
//! delivery, token entropy) is abstracted behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem, the network or the OS entropy pool
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod notifier;
pub mod store;
pub mod token;

pub use clock::NullClock;
pub use notifier::{NullNotifier, SentNotification};
pub use store::NullStore;
pub use token::{FailingTokenSource, NullTokenSource};
