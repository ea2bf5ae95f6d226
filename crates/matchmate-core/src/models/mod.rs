//! Data models for match profiles.
//!
//! This module contains the domain types the synchronizer hands to the
//! presentation layer:
//!
//! - `Profile`: a candidate with display attributes and a decision status
//! - `MatchStatus`: Pending, Accepted or Declined

pub mod profile;

pub use profile::{MatchStatus, Profile};
