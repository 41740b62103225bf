//! Event membership state transitions
//!
//! Owns capacity and the join/leave/ban lifecycle for a single event.
//! Member-set mutations go through the store's atomic array and increment
//! primitives, so concurrent joins never lose updates to the member set
//! itself. The capacity check is read-then-write and therefore race-prone
//! under true concurrency: the store serializes writes per document, which
//! bounds any overshoot to the number of concurrent joiners minus one.

use super::error::{EngineError, EngineResult};
use super::event::{Event, NewEvent};
use super::paths;
use super::types::{EventId, UserId};
use super::uid_value;
use super::user::{UserProfile, UserSummary};
use crate::core_auth::UserIdentity;
use crate::core_store::{from_fields, to_fields, DocumentStore, Filter, OrderBy};
use std::sync::Arc;
use tracing::info;

/// Outcome of a membership toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Joined,
    Unjoined,
}

pub struct MembershipEngine {
    store: Arc<dyn DocumentStore>,
}

impl MembershipEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn load_event(&self, event_id: &EventId) -> EngineResult<Event> {
        let fields = self
            .store
            .get(paths::EVENTS, event_id.as_str())?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;
        Ok(from_fields(fields)?)
    }

    /// Create an event; the creator is seated as the first member
    pub fn create_event(&self, creator: &UserIdentity, input: NewEvent) -> EngineResult<Event> {
        if input.title.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "event title must not be empty".to_string(),
            ));
        }
        if input.max_people == 0 {
            return Err(EngineError::InvalidArgument(
                "max_people must be positive".to_string(),
            ));
        }

        let event = Event::create(input, creator);
        self.store
            .set_merge(paths::EVENTS, event.id.as_str(), to_fields(&event)?)?;
        info!(event_id = %event.id, creator = %creator.uid, "event created");
        Ok(event)
    }

    /// All events, newest first
    pub fn list_events(&self) -> EngineResult<Vec<Event>> {
        let rows = self
            .store
            .query(paths::EVENTS, &Filter::All, Some(&OrderBy::desc("created_at")))?;
        rows.into_iter()
            .map(|(_, fields)| Ok(from_fields(fields)?))
            .collect()
    }

    pub fn get_event(&self, event_id: &EventId) -> EngineResult<Event> {
        self.load_event(event_id)
    }

    /// Join the event if the caller is not a member, leave it if they are
    ///
    /// Joining fails `Forbidden` for banned users and `Capacity` for full
    /// events; leaving is always permitted.
    pub fn toggle_membership(
        &self,
        event_id: &EventId,
        uid: &UserId,
    ) -> EngineResult<MembershipChange> {
        let event = self.load_event(event_id)?;

        if event.is_member(uid) {
            self.store
                .array_remove(paths::EVENTS, event_id.as_str(), "members", uid_value(uid))?;
            self.store
                .increment(paths::EVENTS, event_id.as_str(), "current_people", -1)?;
            info!(event_id = %event_id, uid = %uid, "member left event");
            return Ok(MembershipChange::Unjoined);
        }

        if event.is_banned(uid) {
            return Err(EngineError::Forbidden(
                "user is banned from this event".to_string(),
            ));
        }
        if event.is_full() {
            return Err(EngineError::Capacity);
        }

        self.store
            .array_add(paths::EVENTS, event_id.as_str(), "members", uid_value(uid))?;
        self.store
            .increment(paths::EVENTS, event_id.as_str(), "current_people", 1)?;
        info!(event_id = %event_id, uid = %uid, "member joined event");
        Ok(MembershipChange::Joined)
    }

    /// Remove a member and ban them from rejoining; creator only
    pub fn kick(
        &self,
        event_id: &EventId,
        requester: &UserId,
        target: &UserId,
    ) -> EngineResult<()> {
        let event = self.load_event(event_id)?;

        if !event.is_creator(requester) {
            return Err(EngineError::Forbidden(
                "only the event creator can kick members".to_string(),
            ));
        }
        if event.is_creator(target) {
            return Err(EngineError::InvalidArgument(
                "the event creator cannot be kicked".to_string(),
            ));
        }
        if !event.is_member(target) {
            return Err(EngineError::InvalidArgument(
                "target user is not a member of this event".to_string(),
            ));
        }

        self.store
            .array_remove(paths::EVENTS, event_id.as_str(), "members", uid_value(target))?;
        self.store
            .array_add(paths::EVENTS, event_id.as_str(), "kicked_users", uid_value(target))?;
        self.store
            .increment(paths::EVENTS, event_id.as_str(), "current_people", -1)?;
        info!(event_id = %event_id, target = %target, "member kicked");
        Ok(())
    }

    /// Lift a ban; creator only, idempotent when the target is not banned
    pub fn unblock(
        &self,
        event_id: &EventId,
        requester: &UserId,
        target: &UserId,
    ) -> EngineResult<()> {
        let event = self.load_event(event_id)?;

        if !event.is_creator(requester) {
            return Err(EngineError::Forbidden(
                "only the event creator can unblock users".to_string(),
            ));
        }

        self.store.array_remove(
            paths::EVENTS,
            event_id.as_str(),
            "kicked_users",
            uid_value(target),
        )?;
        info!(event_id = %event_id, target = %target, "user unblocked");
        Ok(())
    }

    /// Profile summaries for banned users; creator only
    pub fn list_blocked(
        &self,
        event_id: &EventId,
        requester: &UserId,
    ) -> EngineResult<Vec<UserSummary>> {
        let event = self.load_event(event_id)?;

        if !event.is_creator(requester) {
            return Err(EngineError::Forbidden(
                "only the event creator can view the blocked list".to_string(),
            ));
        }

        let mut blocked = Vec::new();
        for uid in &event.kicked_users {
            if let Some(fields) = self.store.get(paths::USERS, uid.as_str())? {
                let profile: UserProfile = from_fields(fields)?;
                blocked.push(UserSummary::from_profile(uid.clone(), &profile));
            }
        }
        Ok(blocked)
    }

    /// Profile summaries for the member set, with a placeholder for users
    /// whose profile document is missing
    pub fn list_members(&self, event_id: &EventId) -> EngineResult<Vec<UserSummary>> {
        let event = self.load_event(event_id)?;

        let mut members = Vec::new();
        for uid in &event.members {
            match self.store.get(paths::USERS, uid.as_str())? {
                Some(fields) => {
                    let profile: UserProfile = from_fields(fields)?;
                    members.push(UserSummary::from_profile(uid.clone(), &profile));
                }
                None => members.push(UserSummary::unknown(uid.clone())),
            }
        }
        Ok(members)
    }

    /// Delete the event; creator only
    pub fn delete(&self, event_id: &EventId, requester: &UserId) -> EngineResult<()> {
        let event = self.load_event(event_id)?;

        if !event.is_creator(requester) {
            return Err(EngineError::Forbidden(
                "only the event creator can delete it".to_string(),
            ));
        }

        self.store.delete(paths::EVENTS, event_id.as_str())?;
        info!(event_id = %event_id, "event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{identity, memory_store, sample_event, seed_profile};

    fn engine() -> (MembershipEngine, Arc<dyn DocumentStore>) {
        let store = memory_store();
        (MembershipEngine::new(store.clone()), store)
    }

    #[test]
    fn test_create_event_validates_input() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");

        let mut input = sample_event(4);
        input.title = "   ".to_string();
        assert!(matches!(
            engine.create_event(&alice, input),
            Err(EngineError::InvalidArgument(_))
        ));

        let mut input = sample_event(4);
        input.max_people = 0;
        assert!(matches!(
            engine.create_event(&alice, input),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_toggle_absent_event() {
        let (engine, _) = engine();
        let result = engine.toggle_membership(&EventId::new("nope"), &UserId::new("u1"));
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_join_then_unjoin_restores_state() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        let bob = UserId::new("bob");

        assert_eq!(
            engine.toggle_membership(&event.id, &bob).unwrap(),
            MembershipChange::Joined
        );
        let joined = engine.get_event(&event.id).unwrap();
        assert_eq!(joined.current_people, 2);
        assert!(joined.is_member(&bob));
        assert!(joined.check_invariants().is_ok());

        assert_eq!(
            engine.toggle_membership(&event.id, &bob).unwrap(),
            MembershipChange::Unjoined
        );
        let left = engine.get_event(&event.id).unwrap();
        assert_eq!(left.current_people, 1);
        assert!(!left.is_member(&bob));
        assert!(left.check_invariants().is_ok());
    }

    #[test]
    fn test_full_event_rejects_join_and_keeps_state() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(2)).unwrap();

        engine
            .toggle_membership(&event.id, &UserId::new("bob"))
            .unwrap();
        let result = engine.toggle_membership(&event.id, &UserId::new("carol"));
        assert!(matches!(result, Err(EngineError::Capacity)));

        let unchanged = engine.get_event(&event.id).unwrap();
        assert_eq!(unchanged.current_people, 2);
        assert!(!unchanged.is_member(&UserId::new("carol")));
    }

    #[test]
    fn test_banned_user_rejected_regardless_of_capacity() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(10)).unwrap();
        let bob = UserId::new("bob");

        engine.toggle_membership(&event.id, &bob).unwrap();
        engine.kick(&event.id, &alice.uid, &bob).unwrap();

        let result = engine.toggle_membership(&event.id, &bob);
        assert!(matches!(result, Err(EngineError::Forbidden(_))));
    }

    #[test]
    fn test_kick_moves_member_to_banned_set() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        let bob = UserId::new("bob");

        engine.toggle_membership(&event.id, &bob).unwrap();
        engine.kick(&event.id, &alice.uid, &bob).unwrap();

        let kicked = engine.get_event(&event.id).unwrap();
        assert!(!kicked.is_member(&bob));
        assert!(kicked.is_banned(&bob));
        assert_eq!(kicked.current_people, 1);
        assert!(kicked.check_invariants().is_ok());
    }

    #[test]
    fn test_kick_requires_creator_and_membership() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        let bob = UserId::new("bob");
        engine.toggle_membership(&event.id, &bob).unwrap();

        assert!(matches!(
            engine.kick(&event.id, &bob, &alice.uid),
            Err(EngineError::Forbidden(_))
        ));
        assert!(matches!(
            engine.kick(&event.id, &alice.uid, &UserId::new("carol")),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.kick(&event.id, &alice.uid, &alice.uid),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unblock_allows_rejoin_and_is_idempotent() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        let bob = UserId::new("bob");

        engine.toggle_membership(&event.id, &bob).unwrap();
        engine.kick(&event.id, &alice.uid, &bob).unwrap();
        engine.unblock(&event.id, &alice.uid, &bob).unwrap();
        // unblocking an already-clear user is a no-op
        engine.unblock(&event.id, &alice.uid, &bob).unwrap();

        assert_eq!(
            engine.toggle_membership(&event.id, &bob).unwrap(),
            MembershipChange::Joined
        );
    }

    #[test]
    fn test_blocked_list_is_creator_only() {
        let (engine, store) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        let bob = UserId::new("bob");
        seed_profile(store.as_ref(), "bob", "Bob", "Mech E '28");

        engine.toggle_membership(&event.id, &bob).unwrap();
        engine.kick(&event.id, &alice.uid, &bob).unwrap();

        let blocked = engine.list_blocked(&event.id, &alice.uid).unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].name, "Bob");

        assert!(matches!(
            engine.list_blocked(&event.id, &bob),
            Err(EngineError::Forbidden(_))
        ));
    }

    #[test]
    fn test_list_members_falls_back_for_missing_profiles() {
        let (engine, store) = engine();
        let alice = identity("alice", "Alice");
        seed_profile(store.as_ref(), "alice", "Alice", "");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();
        engine
            .toggle_membership(&event.id, &UserId::new("ghost"))
            .unwrap();

        let members = engine.list_members(&event.id).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Alice");
        assert_eq!(members[1].name, "Unknown User");
    }

    #[test]
    fn test_delete_is_creator_only() {
        let (engine, _) = engine();
        let alice = identity("alice", "Alice");
        let event = engine.create_event(&alice, sample_event(4)).unwrap();

        assert!(matches!(
            engine.delete(&event.id, &UserId::new("bob")),
            Err(EngineError::Forbidden(_))
        ));

        engine.delete(&event.id, &alice.uid).unwrap();
        assert!(matches!(
            engine.get_event(&event.id),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_events_newest_first() {
        let (engine, store) = engine();
        let alice = identity("alice", "Alice");

        let first = engine.create_event(&alice, sample_event(4)).unwrap();
        let second = engine.create_event(&alice, sample_event(4)).unwrap();
        // force distinct created_at ordering regardless of clock resolution
        store
            .set_merge(paths::EVENTS, first.id.as_str(), {
                let mut fields = serde_json::Map::new();
                fields.insert("created_at".to_string(), serde_json::json!(1));
                fields
            })
            .unwrap();
        store
            .set_merge(paths::EVENTS, second.id.as_str(), {
                let mut fields = serde_json::Map::new();
                fields.insert("created_at".to_string(), serde_json::json!(2));
                fields
            })
            .unwrap();

        let events = engine.list_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, second.id);
        assert_eq!(events[1].id, first.id);
    }
}
