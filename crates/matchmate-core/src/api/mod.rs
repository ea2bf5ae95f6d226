//! Remote profile source.
//!
//! This module provides the `ProfileSource` seam the synchronizer fetches
//! through, and `ApiClient`, its HTTP implementation against the
//! randomuser.me API.
//!
//! The API is public and unauthenticated; each request returns a fresh batch
//! of randomly generated users.

pub mod client;
pub mod error;
pub mod source;

pub use client::ApiClient;
pub use error::ApiError;
pub use source::{ProfileSource, RemoteUser, RemoteUsersResponse};
