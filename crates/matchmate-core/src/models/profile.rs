use std::fmt;

use uuid::Uuid;

/// Decision recorded for a profile.
///
/// Persisted as the exact strings returned by [`MatchStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl MatchStatus {
    /// Stored representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "Pending",
            MatchStatus::Accepted => "Accepted",
            MatchStatus::Declined => "Declined",
        }
    }

    /// Decode a stored status.
    /// Anything missing or not an exact stored value falls back to Pending.
    pub fn from_stored(s: Option<&str>) -> Self {
        match s {
            Some("Accepted") => MatchStatus::Accepted,
            Some("Declined") => MatchStatus::Declined,
            Some("Pending") => MatchStatus::Pending,
            _ => MatchStatus::Pending,
        }
    }

    /// True once the user has accepted or declined.
    pub fn is_decided(&self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A candidate profile as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub location: String,
    pub image_url: String,
    pub status: MatchStatus,
}

impl Profile {
    /// Create a freshly fetched profile with a new id and Pending status.
    pub fn new(name: String, age: u32, location: String, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            age,
            location,
            image_url,
            status: MatchStatus::Pending,
        }
    }

    /// One-line summary, e.g. "John Doe, 25 - New York".
    pub fn summary(&self) -> String {
        if self.location.is_empty() {
            format!("{}, {}", self.name, self.age)
        } else {
            format!("{}, {} - {}", self.name, self.age, self.location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_status_from_stored_known() {
        assert_eq!(MatchStatus::from_stored(Some("Pending")), MatchStatus::Pending);
        assert_eq!(MatchStatus::from_stored(Some("Accepted")), MatchStatus::Accepted);
        assert_eq!(MatchStatus::from_stored(Some("Declined")), MatchStatus::Declined);
    }

    #[test]
    fn test_match_status_from_stored_falls_back_to_pending() {
        // Unknown or missing values decode to Pending rather than failing
        assert_eq!(MatchStatus::from_stored(None), MatchStatus::Pending);
        assert_eq!(MatchStatus::from_stored(Some("")), MatchStatus::Pending);
        assert_eq!(MatchStatus::from_stored(Some("Maybe")), MatchStatus::Pending);
        // Matching is exact, lower-case spellings are not recognized
        assert_eq!(MatchStatus::from_stored(Some("accepted")), MatchStatus::Pending);
        assert_eq!(MatchStatus::from_stored(Some("declined")), MatchStatus::Pending);
    }

    #[test]
    fn test_match_status_round_trips_through_as_str() {
        for status in [MatchStatus::Pending, MatchStatus::Accepted, MatchStatus::Declined] {
            assert_eq!(MatchStatus::from_stored(Some(status.as_str())), status);
        }
    }

    #[test]
    fn test_match_status_display_honors_width() {
        assert_eq!(format!("[{:<8}]", MatchStatus::Pending), "[Pending ]");
        assert_eq!(format!("[{:>9}]", MatchStatus::Accepted), "[ Accepted]");
        assert_eq!(format!("{}", MatchStatus::Declined), "Declined");
    }

    #[test]
    fn test_match_status_is_decided() {
        assert!(!MatchStatus::Pending.is_decided());
        assert!(MatchStatus::Accepted.is_decided());
        assert!(MatchStatus::Declined.is_decided());
    }

    #[test]
    fn test_profile_new_is_pending_with_unique_id() {
        let a = Profile::new("A B".into(), 30, "Paris".into(), String::new());
        let b = Profile::new("A B".into(), 30, "Paris".into(), String::new());
        assert_eq!(a.status, MatchStatus::Pending);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_profile_summary() {
        let mut p = Profile::new("John Doe".into(), 25, "New York".into(), String::new());
        assert_eq!(p.summary(), "John Doe, 25 - New York");
        p.location.clear();
        assert_eq!(p.summary(), "John Doe, 25");
    }
}
