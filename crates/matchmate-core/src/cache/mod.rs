//! Local caching module for offline profile access.
//!
//! This module provides the `CacheManager`, the durable copy of the last
//! fetched batch of profiles and the decisions made on them. Records are
//! stored as JSON and the batch is considered stale after 60 minutes.
//!
//! Every write replaces the cache file atomically, so readers see either the
//! previous contents or the new contents and never a half-written batch.

pub mod manager;
pub mod record;

pub use manager::{CacheManager, CachedData};
pub use record::ProfileRecord;
