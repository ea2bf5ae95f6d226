//! The remote source seam and its wire format.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::Profile;

/// Something that can produce a batch of remote user records.
///
/// `ApiClient` is the production implementation; tests substitute their own.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profiles(&self) -> Result<Vec<RemoteUser>>;
}

/// Top-level response body: `{"results": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUsersResponse {
    pub results: Vec<RemoteUser>,
}

/// One user record as returned by the API. Unlisted fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteUser {
    pub name: RemoteName,
    pub dob: RemoteDob,
    pub location: RemoteLocation,
    pub picture: RemotePicture,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteDob {
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteLocation {
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemotePicture {
    pub large: String,
}

impl RemoteUser {
    /// Build a record from plain values; mostly useful for mock sources.
    pub fn new(first: &str, last: &str, age: u32, city: &str, picture: &str) -> Self {
        Self {
            name: RemoteName {
                first: first.to_string(),
                last: last.to_string(),
            },
            dob: RemoteDob { age },
            location: RemoteLocation {
                city: city.to_string(),
            },
            picture: RemotePicture {
                large: picture.to_string(),
            },
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    /// Convert to a domain profile with a fresh id and Pending status.
    pub fn to_profile(&self) -> Profile {
        Profile::new(
            self.full_name(),
            self.dob.age,
            self.location.city.clone(),
            self.picture.large.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    #[test]
    fn test_parse_users_response() {
        let json = r#"{"results":[{"gender":"male","name":{"title":"Mr","first":"John","last":"Doe"},"location":{"street":{"number":12,"name":"Main St"},"city":"New York","country":"United States"},"email":"john.doe@example.com","dob":{"date":"1999-03-02T10:00:00.000Z","age":25},"picture":{"large":"https://x/img.jpg","medium":"https://x/med.jpg","thumbnail":"https://x/thumb.jpg"},"nat":"US"}],"info":{"seed":"abc","results":1,"page":1,"version":"1.4"}}"#;

        let resp: RemoteUsersResponse =
            serde_json::from_str(json).expect("Failed to parse users test JSON");
        assert_eq!(resp.results.len(), 1);

        let user = &resp.results[0];
        assert_eq!(user.name.first, "John");
        assert_eq!(user.name.last, "Doe");
        assert_eq!(user.dob.age, 25);
        assert_eq!(user.location.city, "New York");
        assert_eq!(user.picture.large, "https://x/img.jpg");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        // No dob at all
        let json = r#"{"results":[{"name":{"first":"A","last":"B"},"location":{"city":"C"},"picture":{"large":"D"}}]}"#;
        assert!(serde_json::from_str::<RemoteUsersResponse>(json).is_err());

        // Wrong type for age
        let json = r#"{"results":[{"name":{"first":"A","last":"B"},"dob":{"age":"old"},"location":{"city":"C"},"picture":{"large":"D"}}]}"#;
        assert!(serde_json::from_str::<RemoteUsersResponse>(json).is_err());

        // Missing results wrapper
        assert!(serde_json::from_str::<RemoteUsersResponse>(r#"{"error":"busy"}"#).is_err());
    }

    #[test]
    fn test_to_profile() {
        let user = RemoteUser::new("John", "Doe", 25, "New York", "https://x/img.jpg");
        let profile = user.to_profile();

        assert_eq!(profile.name, "John Doe");
        assert_eq!(profile.age, 25);
        assert_eq!(profile.location, "New York");
        assert_eq!(profile.image_url, "https://x/img.jpg");
        assert_eq!(profile.status, MatchStatus::Pending);
    }

    #[test]
    fn test_to_profile_generates_fresh_ids() {
        let user = RemoteUser::new("Jane", "Roe", 30, "Chicago", "");
        assert_ne!(user.to_profile().id, user.to_profile().id);
    }
}
