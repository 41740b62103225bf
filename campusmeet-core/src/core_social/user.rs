//! User profile documents and listing projections

use super::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Profile document stored under the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub created_at: Timestamp,
}

/// Short projection used by member, blocked, and request listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub uid: UserId,
    pub name: String,
    pub title: String,
}

impl UserSummary {
    pub fn from_profile(uid: UserId, profile: &UserProfile) -> Self {
        Self {
            uid,
            name: profile.name.clone(),
            title: profile.title.clone(),
        }
    }

    /// Placeholder for members whose profile document is missing
    pub fn unknown(uid: UserId) -> Self {
        Self {
            uid,
            name: "Unknown User".to_string(),
            title: String::new(),
        }
    }
}
