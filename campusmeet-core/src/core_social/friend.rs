//! Friend-request and friendship edge documents
//!
//! A pending request is a directed edge stored twice: the inbox half under
//! the target and the outbox half under the sender. A friendship is an
//! undirected edge stored as two symmetric documents, one under each user's
//! friends collection. Both halves of an edge are created and removed
//! together; a lone half is an inconsistency the engine repairs.

use super::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Inbox half of a pending request, stored under the target's
/// `friend_requests` collection keyed by the sender uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub sender_uid: UserId,
    pub sender_name: String,
    pub timestamp: Timestamp,
}

/// Outbox half of a pending request, stored under the sender's
/// `sent_requests` collection keyed by the target uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentRequest {
    pub target_uid: UserId,
    pub timestamp: Timestamp,
}

/// One half of a confirmed friendship, keyed by the other user's uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendEdge {
    pub added_at: Timestamp,
}

/// Outgoing request enriched with the target's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingRequest {
    pub target_uid: UserId,
    pub name: String,
    pub title: String,
}

/// Friend listing entry with current event activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSummary {
    pub uid: UserId,
    pub name: String,
    pub title: String,
    /// Title of an event the friend is currently a member of, if any
    pub active_event: Option<String>,
}
