//! Collection paths for the documents the engines own

use super::types::{EventId, PairId, UserId};

pub const EVENTS: &str = "events";
pub const USERS: &str = "users";

pub fn friends(uid: &UserId) -> String {
    format!("users/{uid}/friends")
}

pub fn friend_requests(uid: &UserId) -> String {
    format!("users/{uid}/friend_requests")
}

pub fn sent_requests(uid: &UserId) -> String {
    format!("users/{uid}/sent_requests")
}

pub fn event_messages(event_id: &EventId) -> String {
    format!("events/{event_id}/messages")
}

pub fn direct_messages(pair: &PairId) -> String {
    format!("direct_messages/{pair}/messages")
}
