//! Chat stream access control and message append
//!
//! Every message belongs to exactly one stream, either an event chat or a
//! direct chat between two users. Event chat is gated on current
//! membership; the gate re-checks on every call, so a kicked member loses
//! access immediately. Direct chat carries no gate beyond authentication.

use super::error::{EngineError, EngineResult};
use super::event::Event;
use super::message::ChatMessage;
use super::paths;
use super::types::{EventId, PairId, UserId};
use crate::core_auth::UserIdentity;
use crate::core_store::{from_fields, to_fields, DocumentStore, Filter, OrderBy};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Resolved handle on a chat stream the caller may read and write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamKey {
    Event(EventId),
    Direct(PairId),
}

impl ChatStreamKey {
    fn collection(&self) -> String {
        match self {
            ChatStreamKey::Event(event_id) => paths::event_messages(event_id),
            ChatStreamKey::Direct(pair) => paths::direct_messages(pair),
        }
    }
}

pub struct ChatGate {
    store: Arc<dyn DocumentStore>,
}

impl ChatGate {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Resolve the event chat stream, enforcing membership
    pub fn event_stream(&self, event_id: &EventId, uid: &UserId) -> EngineResult<ChatStreamKey> {
        let fields = self
            .store
            .get(paths::EVENTS, event_id.as_str())?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;
        let event: Event = from_fields(fields)?;

        if !event.can_access_chat(uid) {
            return Err(EngineError::Forbidden(
                "only event members can access the event chat".to_string(),
            ));
        }
        Ok(ChatStreamKey::Event(event_id.clone()))
    }

    /// Resolve the direct chat stream between two users
    ///
    /// The key is symmetric: both users resolve to the same stream
    /// regardless of argument order.
    pub fn direct_stream(&self, a: &UserId, b: &UserId) -> ChatStreamKey {
        ChatStreamKey::Direct(PairId::of(a, b))
    }

    /// Append a message to a resolved stream
    pub fn append_message(
        &self,
        stream: &ChatStreamKey,
        sender: &UserIdentity,
        text: &str,
    ) -> EngineResult<ChatMessage> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "message must not be empty".to_string(),
            ));
        }

        let message = ChatMessage::new(sender, text);
        let doc_id = Uuid::new_v4().to_string();
        self.store
            .set_merge(&stream.collection(), &doc_id, to_fields(&message)?)?;
        debug!(sender = %sender.uid, "message appended");
        Ok(message)
    }

    /// Messages in a resolved stream, oldest first
    pub fn list_messages(&self, stream: &ChatStreamKey) -> EngineResult<Vec<ChatMessage>> {
        let rows = self.store.query(
            &stream.collection(),
            &Filter::All,
            Some(&OrderBy::asc("timestamp")),
        )?;
        rows.into_iter()
            .map(|(_, fields)| Ok(from_fields(fields)?))
            .collect()
    }
}
