//! Async service facade
//!
//! This wraps the synchronous engines behind one async surface and owns the
//! only authentication check in the crate: every operation except the public
//! event listing resolves the caller's bearer token first and fails
//! `Unauthenticated` when it does not resolve. The engines below never see
//! an unauthenticated caller.

use super::chat::ChatGate;
use super::error::{EngineError, EngineResult};
use super::event::{Event, NewEvent};
use super::friend::{FriendRequest, FriendSummary, OutgoingRequest};
use super::graph::{ReconcileReport, SocialGraphEngine};
use super::membership::{MembershipChange, MembershipEngine};
use super::message::ChatMessage;
use super::types::{EventId, UserId};
use super::user::UserSummary;
use crate::core_auth::{Authenticator, UserIdentity};
use crate::core_store::DocumentStore;
use std::sync::Arc;

pub struct MeetupService {
    authenticator: Arc<dyn Authenticator>,
    membership: MembershipEngine,
    graph: SocialGraphEngine,
    chat: ChatGate,
}

impl MeetupService {
    pub fn new(store: Arc<dyn DocumentStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            membership: MembershipEngine::new(store.clone()),
            graph: SocialGraphEngine::new(store.clone()),
            chat: ChatGate::new(store),
        }
    }

    fn identity(&self, bearer_token: &str) -> EngineResult<UserIdentity> {
        self.authenticator
            .verify(bearer_token)
            .ok_or(EngineError::Unauthenticated)
    }

    // event membership

    pub async fn create_event(&self, token: &str, input: NewEvent) -> EngineResult<Event> {
        let caller = self.identity(token)?;
        self.membership.create_event(&caller, input)
    }

    /// Event listing is public; no token required
    pub async fn list_events(&self) -> EngineResult<Vec<Event>> {
        self.membership.list_events()
    }

    pub async fn get_event(&self, token: &str, event_id: &EventId) -> EngineResult<Event> {
        self.identity(token)?;
        self.membership.get_event(event_id)
    }

    pub async fn toggle_membership(
        &self,
        token: &str,
        event_id: &EventId,
    ) -> EngineResult<MembershipChange> {
        let caller = self.identity(token)?;
        self.membership.toggle_membership(event_id, &caller.uid)
    }

    pub async fn kick(
        &self,
        token: &str,
        event_id: &EventId,
        target: &UserId,
    ) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.membership.kick(event_id, &caller.uid, target)
    }

    pub async fn unblock(
        &self,
        token: &str,
        event_id: &EventId,
        target: &UserId,
    ) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.membership.unblock(event_id, &caller.uid, target)
    }

    pub async fn list_blocked(
        &self,
        token: &str,
        event_id: &EventId,
    ) -> EngineResult<Vec<UserSummary>> {
        let caller = self.identity(token)?;
        self.membership.list_blocked(event_id, &caller.uid)
    }

    pub async fn list_members(
        &self,
        token: &str,
        event_id: &EventId,
    ) -> EngineResult<Vec<UserSummary>> {
        self.identity(token)?;
        self.membership.list_members(event_id)
    }

    pub async fn delete_event(&self, token: &str, event_id: &EventId) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.membership.delete(event_id, &caller.uid)
    }

    // social graph

    pub async fn send_friend_request(&self, token: &str, target: &UserId) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.graph.send_request(&caller, target)
    }

    pub async fn accept_friend_request(
        &self,
        token: &str,
        requester: &UserId,
    ) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.graph.accept(requester, &caller.uid)
    }

    pub async fn reject_friend_request(
        &self,
        token: &str,
        requester: &UserId,
    ) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.graph.reject(requester, &caller.uid)
    }

    pub async fn cancel_friend_request(&self, token: &str, target: &UserId) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.graph.cancel(&caller.uid, target)
    }

    pub async fn remove_friend(&self, token: &str, friend: &UserId) -> EngineResult<()> {
        let caller = self.identity(token)?;
        self.graph.remove_friend(&caller.uid, friend)
    }

    pub async fn list_friends(&self, token: &str) -> EngineResult<Vec<FriendSummary>> {
        let caller = self.identity(token)?;
        self.graph.list_friends(&caller.uid)
    }

    pub async fn list_incoming_requests(&self, token: &str) -> EngineResult<Vec<FriendRequest>> {
        let caller = self.identity(token)?;
        self.graph.list_incoming(&caller.uid)
    }

    pub async fn list_outgoing_requests(
        &self,
        token: &str,
    ) -> EngineResult<Vec<OutgoingRequest>> {
        let caller = self.identity(token)?;
        self.graph.list_outgoing(&caller.uid)
    }

    pub async fn reconcile(&self, token: &str) -> EngineResult<ReconcileReport> {
        let caller = self.identity(token)?;
        self.graph.reconcile(&caller.uid)
    }

    // chat

    pub async fn send_event_message(
        &self,
        token: &str,
        event_id: &EventId,
        text: &str,
    ) -> EngineResult<ChatMessage> {
        let caller = self.identity(token)?;
        let stream = self.chat.event_stream(event_id, &caller.uid)?;
        self.chat.append_message(&stream, &caller, text)
    }

    pub async fn list_event_messages(
        &self,
        token: &str,
        event_id: &EventId,
    ) -> EngineResult<Vec<ChatMessage>> {
        let caller = self.identity(token)?;
        let stream = self.chat.event_stream(event_id, &caller.uid)?;
        self.chat.list_messages(&stream)
    }

    pub async fn send_direct_message(
        &self,
        token: &str,
        other: &UserId,
        text: &str,
    ) -> EngineResult<ChatMessage> {
        let caller = self.identity(token)?;
        let stream = self.chat.direct_stream(&caller.uid, other);
        self.chat.append_message(&stream, &caller, text)
    }

    pub async fn list_direct_messages(
        &self,
        token: &str,
        other: &UserId,
    ) -> EngineResult<Vec<ChatMessage>> {
        let caller = self.identity(token)?;
        let stream = self.chat.direct_stream(&caller.uid, other);
        self.chat.list_messages(&stream)
    }
}
