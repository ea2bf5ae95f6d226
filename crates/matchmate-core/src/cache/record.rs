use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MatchStatus, Profile};

/// Persisted form of a profile.
///
/// `status` is kept as the raw stored string so that unknown values survive
/// on disk and are only interpreted when converted back into a `Profile`.
/// A record stored without an id decodes with a freshly generated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ProfileRecord {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            age: profile.age,
            location: profile.location.clone(),
            image_url: profile.image_url.clone(),
            status: Some(profile.status.as_str().to_string()),
        }
    }

    pub fn match_status(&self) -> MatchStatus {
        MatchStatus::from_stored(self.status.as_deref())
    }

    pub fn to_profile(&self) -> Profile {
        Profile {
            id: self.id,
            name: self.name.clone(),
            age: self.age,
            location: self.location.clone(),
            image_url: self.image_url.clone(),
            status: self.match_status(),
        }
    }
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        Self::from_profile(profile)
    }
}
