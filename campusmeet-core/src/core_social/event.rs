//! Event data structures and operations

use super::types::{EventId, Timestamp, UserId};
use crate::core_auth::UserIdentity;
use serde::{Deserialize, Serialize};

/// A capacity-bounded group event with a creator and member set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// Human-readable title
    pub title: String,

    /// Category label (sports, study, coffee, ...)
    pub category: String,

    /// Where the event takes place
    pub location: String,

    /// Capacity bound, always positive
    pub max_people: u32,

    /// Member count, kept equal to `members.len()`
    pub current_people: u32,

    /// Scheduled date (as entered by the creator)
    pub event_date: String,

    /// Scheduled time (as entered by the creator)
    pub event_time: String,

    /// When the event was created
    pub created_at: Timestamp,

    /// Display name of the creator at creation time
    pub creator_name: String,

    /// Owner of the event; immutable, a permanent implicit member
    pub creator_uid: UserId,

    /// Member set, insertion order irrelevant
    #[serde(default)]
    pub members: Vec<UserId>,

    /// Users banned from rejoining; always disjoint from `members`
    #[serde(default)]
    pub kicked_users: Vec<UserId>,
}

/// Creator-supplied fields for a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub category: String,
    pub location: String,
    pub max_people: u32,
    pub event_date: String,
    pub event_time: String,
}

impl Event {
    /// Create a new event; the creator becomes the first member
    pub fn create(input: NewEvent, creator: &UserIdentity) -> Self {
        Event {
            id: EventId::generate(),
            title: input.title,
            category: input.category,
            location: input.location,
            max_people: input.max_people,
            current_people: 1,
            event_date: input.event_date,
            event_time: input.event_time,
            created_at: Timestamp::now(),
            creator_name: creator.name.clone(),
            creator_uid: creator.uid.clone(),
            members: vec![creator.uid.clone()],
            kicked_users: Vec::new(),
        }
    }

    /// Check if a user is in the member set
    pub fn is_member(&self, uid: &UserId) -> bool {
        self.members.contains(uid)
    }

    /// Check if a user is banned from rejoining
    pub fn is_banned(&self, uid: &UserId) -> bool {
        self.kicked_users.contains(uid)
    }

    /// Check if a user owns the event
    pub fn is_creator(&self, uid: &UserId) -> bool {
        &self.creator_uid == uid
    }

    /// Check if the event is at capacity
    pub fn is_full(&self) -> bool {
        self.current_people >= self.max_people
    }

    /// Event chat is open to members and the creator
    pub fn can_access_chat(&self, uid: &UserId) -> bool {
        self.is_member(uid) || self.is_creator(uid)
    }

    /// Verify the structural invariants every stored event must satisfy
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.current_people as usize != self.members.len() {
            return Err(format!(
                "current_people {} does not match member count {}",
                self.current_people,
                self.members.len()
            ));
        }
        if let Some(uid) = self.members.iter().find(|m| self.kicked_users.contains(m)) {
            return Err(format!("user {uid} is both a member and banned"));
        }
        if self.current_people > self.max_people {
            return Err(format!(
                "current_people {} exceeds max_people {}",
                self.current_people, self.max_people
            ));
        }
        Ok(())
    }
}
