//! Chat message documents
//!
//! Messages are append-only, never edited or deleted individually. Display
//! order is by server-assigned timestamp, not arrival order.

use super::types::{Timestamp, UserId};
use crate::core_auth::UserIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender_uid: UserId,
    pub sender_name: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Build a message from the resolved sender with a server-assigned
    /// timestamp
    pub fn new(sender: &UserIdentity, text: &str) -> Self {
        Self {
            sender_uid: sender.uid.clone(),
            sender_name: sender.name.clone(),
            message: text.to_string(),
            timestamp: Timestamp::now(),
        }
    }
}
