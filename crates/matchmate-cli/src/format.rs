//! Plain-text formatting for profile listings.

use matchmate_core::{MatchStatus, Profile, RefreshOutcome};

/// Maximum width of the summary column
const SUMMARY_WIDTH: usize = 40;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn status_marker(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Pending => " ",
        MatchStatus::Accepted => "+",
        MatchStatus::Declined => "x",
    }
}

/// One line per profile: marker, id, status, summary
pub fn profile_line(profile: &Profile) -> String {
    format!(
        "{} {}  {:<8}  {}",
        status_marker(profile.status),
        profile.id,
        profile.status,
        truncate(&profile.summary(), SUMMARY_WIDTH)
    )
}

pub fn outcome_line(outcome: RefreshOutcome, cache_age: Option<&str>) -> String {
    match outcome {
        RefreshOutcome::Fetched(n) => format!("Fetched {} new profiles", n),
        RefreshOutcome::FromCache(n) => format!(
            "Offline - showing {} cached profiles (updated {})",
            n,
            cache_age.unwrap_or("never")
        ),
        RefreshOutcome::Unchanged => "Offline and cache unreadable - profiles may be stale".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 10), "this is...");
        assert_eq!(truncate("abcdef", 3), "abc");
        // Multi-byte characters count as one
        assert_eq!(truncate("Zoë Müller", 10), "Zoë Müller");
    }

    #[test]
    fn test_profile_line() {
        let mut profile = Profile::new("John Doe".into(), 25, "New York".into(), String::new());
        profile.status = MatchStatus::Accepted;
        let line = profile_line(&profile);

        assert!(line.starts_with("+ "));
        assert!(line.contains(&profile.id.to_string()));
        assert!(line.contains("Accepted"));
        assert!(line.ends_with("John Doe, 25 - New York"));
    }

    #[test]
    fn test_profile_line_status_column_is_aligned() {
        let pending = Profile::new("Ann".into(), 30, String::new(), String::new());
        let mut declined = pending.clone();
        declined.status = MatchStatus::Declined;

        let pending_line = profile_line(&pending);
        let declined_line = profile_line(&declined);
        assert!(pending_line.contains("  Pending   Ann, 30"));
        assert!(declined_line.contains("  Declined  Ann, 30"));
        assert_eq!(pending_line.len(), declined_line.len());
    }

    #[test]
    fn test_outcome_line() {
        assert_eq!(outcome_line(RefreshOutcome::Fetched(10), None), "Fetched 10 new profiles");
        assert_eq!(
            outcome_line(RefreshOutcome::FromCache(3), Some("5m ago")),
            "Offline - showing 3 cached profiles (updated 5m ago)"
        );
        assert!(outcome_line(RefreshOutcome::FromCache(0), None).contains("never"));
    }
}
