//! Group membership and social graph engines
//!
//! Three sync engines own the domain rules, each over the same document
//! store: [`membership::MembershipEngine`] for the event join/leave/ban
//! lifecycle, [`graph::SocialGraphEngine`] for friend requests and
//! friendships, and [`chat::ChatGate`] for chat-stream access. The async
//! [`service::MeetupService`] facade fronts all three and performs token
//! authentication.
//!
//! The engines treat the store as source of truth and keep its documents
//! consistent: member counts track member sets, banned users stay out of
//! member sets, and every friendship or pending request exists as a
//! symmetric pair of documents.

pub mod chat;
pub mod error;
pub mod event;
pub mod friend;
pub mod graph;
pub mod membership;
pub mod message;
pub(crate) mod paths;
pub mod service;
pub mod types;
pub mod user;

pub use chat::{ChatGate, ChatStreamKey};
pub use error::{EngineError, EngineResult};
pub use event::{Event, NewEvent};
pub use friend::{FriendRequest, FriendSummary, OutgoingRequest, SentRequest};
pub use graph::{ReconcileReport, SocialGraphEngine};
pub use membership::{MembershipChange, MembershipEngine};
pub use message::ChatMessage;
pub use service::MeetupService;
pub use types::{EventId, PairId, Timestamp, UserId};
pub use user::{UserProfile, UserSummary};

use serde_json::Value;

/// Uids are stored inside documents as plain JSON strings
pub(crate) fn uid_value(uid: &UserId) -> Value {
    Value::String(uid.as_str().to_owned())
}
