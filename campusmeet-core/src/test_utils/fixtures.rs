//! Builders for the documents and identities tests work with

use crate::core_auth::UserIdentity;
use crate::core_social::{NewEvent, Timestamp, UserProfile};
use crate::core_store::{to_fields, DocumentStore, MemoryStore};
use std::sync::Arc;

/// Fresh in-memory store
pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

/// Resolved identity without going through an authenticator
pub fn identity(uid: &str, name: &str) -> UserIdentity {
    UserIdentity::new(uid, name)
}

/// Write a minimal profile document for a user
pub fn seed_profile(store: &dyn DocumentStore, uid: &str, name: &str, title: &str) {
    let profile = UserProfile {
        name: name.to_string(),
        email: format!("{uid}@campus.edu"),
        bio: String::new(),
        title: title.to_string(),
        created_at: Timestamp::now(),
    };
    store
        .set_merge("users", uid, to_fields(&profile).unwrap())
        .unwrap();
}

/// Valid event input with the given capacity
pub fn sample_event(max_people: u32) -> NewEvent {
    NewEvent {
        title: "Badminton Doubles".to_string(),
        category: "Sports".to_string(),
        location: "Rec Center".to_string(),
        max_people,
        event_date: "2026-09-01".to_string(),
        event_time: "18:00".to_string(),
    }
}
