//! Friend-request and friendship lifecycle
//!
//! Per ordered pair of users the relation moves between three states:
//! stranger, pending (one direction), and friends. A pending edge lives as
//! two documents (target inbox + sender outbox), a friendship as two
//! symmetric documents. The dual writes are not atomic across documents;
//! `send_request` rolls back its first half when the second fails, `accept`
//! writes friendship halves before deleting request halves so a crash leaves
//! the recoverable "friends plus stale request" state, and `reconcile`
//! detects and heals halves left behind anyway.

use super::error::{EngineError, EngineResult};
use super::friend::{FriendEdge, FriendRequest, FriendSummary, OutgoingRequest, SentRequest};
use super::paths;
use super::types::{Timestamp, UserId};
use super::uid_value;
use super::user::UserProfile;
use crate::core_auth::UserIdentity;
use crate::core_store::{from_fields, to_fields, DocumentStore, Filter};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a reconciliation pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Friends whose reverse half was missing and has been restored
    pub healed_friendships: Vec<UserId>,
    /// Counterparts of pending-request halves that were orphaned and dropped
    pub dropped_requests: Vec<UserId>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.healed_friendships.is_empty() && self.dropped_requests.is_empty()
    }
}

pub struct SocialGraphEngine {
    store: Arc<dyn DocumentStore>,
}

impl SocialGraphEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Whether a confirmed friendship exists between the two users
    pub fn is_friends(&self, a: &UserId, b: &UserId) -> EngineResult<bool> {
        Ok(self.store.get(&paths::friends(a), b.as_str())?.is_some())
    }

    /// Create a pending request from the sender to the target
    pub fn send_request(&self, sender: &UserIdentity, target: &UserId) -> EngineResult<()> {
        if sender.uid == *target {
            return Err(EngineError::InvalidArgument(
                "cannot send a friend request to yourself".to_string(),
            ));
        }
        if self.is_friends(&sender.uid, target)? {
            return Err(EngineError::Conflict("already friends".to_string()));
        }

        let now = Timestamp::now();
        let inbox = to_fields(&FriendRequest {
            sender_uid: sender.uid.clone(),
            sender_name: sender.name.clone(),
            timestamp: now,
        })?;
        let outbox = to_fields(&SentRequest {
            target_uid: target.clone(),
            timestamp: now,
        })?;

        self.store
            .set_merge(&paths::friend_requests(target), sender.uid.as_str(), inbox)?;
        if let Err(err) =
            self.store
                .set_merge(&paths::sent_requests(&sender.uid), target.as_str(), outbox)
        {
            // roll back the inbox half rather than leave a dangling edge
            if let Err(rollback) = self
                .store
                .delete(&paths::friend_requests(target), sender.uid.as_str())
            {
                warn!(
                    sender = %sender.uid,
                    target = %target,
                    error = %rollback,
                    "failed to roll back inbox half of friend request"
                );
            }
            return Err(err.into());
        }

        info!(sender = %sender.uid, target = %target, "friend request sent");
        Ok(())
    }

    /// Convert a pending request into a friendship
    ///
    /// Friendship halves are written before the request halves are deleted:
    /// a crash mid-operation leaves "friends and still pending", never
    /// "neither".
    pub fn accept(&self, requester: &UserId, accepter: &UserId) -> EngineResult<()> {
        if self
            .store
            .get(&paths::friend_requests(accepter), requester.as_str())?
            .is_none()
        {
            return Err(EngineError::NotFound(format!(
                "friend request from {requester}"
            )));
        }

        let edge = to_fields(&FriendEdge {
            added_at: Timestamp::now(),
        })?;
        self.store
            .set_merge(&paths::friends(accepter), requester.as_str(), edge.clone())?;
        self.store
            .set_merge(&paths::friends(requester), accepter.as_str(), edge)?;

        self.store
            .delete(&paths::friend_requests(accepter), requester.as_str())?;
        self.store
            .delete(&paths::sent_requests(requester), accepter.as_str())?;

        info!(requester = %requester, accepter = %accepter, "friend request accepted");
        Ok(())
    }

    /// Drop a pending request from the accepter's side; no-op when absent
    pub fn reject(&self, requester: &UserId, accepter: &UserId) -> EngineResult<()> {
        self.store
            .delete(&paths::friend_requests(accepter), requester.as_str())?;
        self.store
            .delete(&paths::sent_requests(requester), accepter.as_str())?;
        debug!(requester = %requester, accepter = %accepter, "friend request rejected");
        Ok(())
    }

    /// Withdraw a pending request from the sender's side; no-op when absent
    pub fn cancel(&self, sender: &UserId, target: &UserId) -> EngineResult<()> {
        self.store
            .delete(&paths::sent_requests(sender), target.as_str())?;
        self.store
            .delete(&paths::friend_requests(target), sender.as_str())?;
        debug!(sender = %sender, target = %target, "friend request cancelled");
        Ok(())
    }

    /// Dissolve a friendship from both sides; no-op when absent
    pub fn remove_friend(&self, a: &UserId, b: &UserId) -> EngineResult<()> {
        self.store.delete(&paths::friends(a), b.as_str())?;
        self.store.delete(&paths::friends(b), a.as_str())?;
        info!(a = %a, b = %b, "friendship removed");
        Ok(())
    }

    /// Pending requests waiting on the user
    pub fn list_incoming(&self, uid: &UserId) -> EngineResult<Vec<FriendRequest>> {
        let rows = self
            .store
            .query(&paths::friend_requests(uid), &Filter::All, None)?;
        rows.into_iter()
            .map(|(_, fields)| Ok(from_fields(fields)?))
            .collect()
    }

    /// Requests the user has sent, enriched with the target's profile;
    /// targets without a profile are omitted
    pub fn list_outgoing(&self, uid: &UserId) -> EngineResult<Vec<OutgoingRequest>> {
        let rows = self
            .store
            .query(&paths::sent_requests(uid), &Filter::All, None)?;

        let mut outgoing = Vec::new();
        for (_, fields) in rows {
            let sent: SentRequest = from_fields(fields)?;
            if let Some(profile_fields) = self
                .store
                .get(paths::USERS, sent.target_uid.as_str())?
            {
                let profile: UserProfile = from_fields(profile_fields)?;
                outgoing.push(OutgoingRequest {
                    target_uid: sent.target_uid,
                    name: profile.name,
                    title: profile.title,
                });
            }
        }
        Ok(outgoing)
    }

    /// Confirmed friends with their profile and current event activity;
    /// friends without a profile are omitted
    pub fn list_friends(&self, uid: &UserId) -> EngineResult<Vec<FriendSummary>> {
        let rows = self.store.query(&paths::friends(uid), &Filter::All, None)?;

        let mut friends = Vec::new();
        for (friend_id, _) in rows {
            let friend_uid = UserId::new(friend_id);
            let Some(profile_fields) = self.store.get(paths::USERS, friend_uid.as_str())? else {
                continue;
            };
            let profile: UserProfile = from_fields(profile_fields)?;
            let active_event = self.active_event(&friend_uid)?;
            friends.push(FriendSummary {
                uid: friend_uid,
                name: profile.name,
                title: profile.title,
                active_event,
            });
        }
        Ok(friends)
    }

    /// Title of some event the user currently holds membership in
    fn active_event(&self, uid: &UserId) -> EngineResult<Option<String>> {
        let rows = self.store.query(
            paths::EVENTS,
            &Filter::array_contains("members", uid_value(uid)),
            None,
        )?;
        Ok(rows.into_iter().next().map(|(_, fields)| {
            fields
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        }))
    }

    /// Detect and heal half-edges around one user
    ///
    /// A friendship half without its reverse means a crashed accept; the
    /// missing half is written back. A pending-request half without its
    /// counterpart is deleted.
    pub fn reconcile(&self, uid: &UserId) -> EngineResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for (friend_id, edge) in self.store.query(&paths::friends(uid), &Filter::All, None)? {
            let friend = UserId::new(friend_id);
            if self.store.get(&paths::friends(&friend), uid.as_str())?.is_none() {
                self.store
                    .set_merge(&paths::friends(&friend), uid.as_str(), edge)?;
                warn!(user = %uid, friend = %friend, "restored missing friendship half");
                report.healed_friendships.push(friend);
            }
        }

        for (sender_id, _) in self
            .store
            .query(&paths::friend_requests(uid), &Filter::All, None)?
        {
            let sender = UserId::new(sender_id);
            if self
                .store
                .get(&paths::sent_requests(&sender), uid.as_str())?
                .is_none()
            {
                self.store
                    .delete(&paths::friend_requests(uid), sender.as_str())?;
                warn!(user = %uid, sender = %sender, "dropped orphan incoming request half");
                report.dropped_requests.push(sender);
            }
        }

        for (target_id, _) in self
            .store
            .query(&paths::sent_requests(uid), &Filter::All, None)?
        {
            let target = UserId::new(target_id);
            if self
                .store
                .get(&paths::friend_requests(&target), uid.as_str())?
                .is_none()
            {
                self.store
                    .delete(&paths::sent_requests(uid), target.as_str())?;
                warn!(user = %uid, target = %target, "dropped orphan outgoing request half");
                report.dropped_requests.push(target);
            }
        }

        Ok(report)
    }
}
