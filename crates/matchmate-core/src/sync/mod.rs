//! Profile synchronizer.
//!
//! Keeps the in-memory profile list consistent with the remote source when it
//! is reachable and with the local cache when it is not, and persists the
//! user's accept/decline decisions.

pub mod synchronizer;


pub use synchronizer::{ProfileSynchronizer, RefreshOutcome, StatusUpdate, SubscriptionId};
