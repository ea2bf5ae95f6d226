//! Core library for matchmate.
//!
//! Fetches batches of user profiles from a remote API, caches them locally
//! and records accept/decline decisions:
//!
//! - `api`: the `ProfileSource` seam and its HTTP client
//! - `cache`: the on-disk profile store
//! - `config`: endpoint, batch size and cache location
//! - `models`: `Profile` and `MatchStatus`
//! - `sync`: `ProfileSynchronizer`, which ties the above together

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod sync;

pub use api::{ApiClient, ApiError, ProfileSource, RemoteUser};
pub use cache::CacheManager;
pub use config::Config;
pub use models::{MatchStatus, Profile};
pub use sync::{ProfileSynchronizer, RefreshOutcome, StatusUpdate, SubscriptionId};
