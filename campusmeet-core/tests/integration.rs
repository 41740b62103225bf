//! End-to-end scenarios through the async service facade

use campusmeet_core::core_auth::StaticAuthenticator;
use campusmeet_core::core_social::{
    EngineError, MeetupService, MembershipChange, NewEvent, UserId,
};
use campusmeet_core::test_utils::fixtures::{identity, memory_store, seed_profile};
use std::sync::Arc;

const ALICE: &str = "tok-alice";
const BOB: &str = "tok-bob";
const CAROL: &str = "tok-carol";

fn service() -> MeetupService {
    let store = memory_store();
    seed_profile(store.as_ref(), "alice", "Alice", "CS '27");
    seed_profile(store.as_ref(), "bob", "Bob", "Mech E '28");
    seed_profile(store.as_ref(), "carol", "Carol", "Bio '29");

    let auth = StaticAuthenticator::new()
        .register(ALICE, identity("alice", "Alice"))
        .register(BOB, identity("bob", "Bob"))
        .register(CAROL, identity("carol", "Carol"));
    MeetupService::new(store, Arc::new(auth))
}

fn pickup_game(max_people: u32) -> NewEvent {
    NewEvent {
        title: "Pickup Basketball".to_string(),
        category: "Sports".to_string(),
        location: "North Gym".to_string(),
        max_people,
        event_date: "2026-09-05".to_string(),
        event_time: "19:00".to_string(),
    }
}

#[tokio::test]
async fn event_lifecycle_with_capacity_and_bans() {
    let service = service();

    let event = service.create_event(ALICE, pickup_game(2)).await.unwrap();
    assert_eq!(event.current_people, 1);

    // bob takes the last seat; carol bounces off capacity
    assert_eq!(
        service.toggle_membership(BOB, &event.id).await.unwrap(),
        MembershipChange::Joined
    );
    assert!(matches!(
        service.toggle_membership(CAROL, &event.id).await,
        Err(EngineError::Capacity)
    ));

    // kicking bob frees the seat but bans him
    service
        .kick(ALICE, &event.id, &UserId::new("bob"))
        .await
        .unwrap();
    assert!(matches!(
        service.toggle_membership(BOB, &event.id).await,
        Err(EngineError::Forbidden(_))
    ));
    assert_eq!(
        service.toggle_membership(CAROL, &event.id).await.unwrap(),
        MembershipChange::Joined
    );

    let blocked = service.list_blocked(ALICE, &event.id).await.unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].name, "Bob");

    // after an unblock bob can rejoin once a seat opens
    service
        .unblock(ALICE, &event.id, &UserId::new("bob"))
        .await
        .unwrap();
    service.toggle_membership(CAROL, &event.id).await.unwrap();
    assert_eq!(
        service.toggle_membership(BOB, &event.id).await.unwrap(),
        MembershipChange::Joined
    );

    let current = service.get_event(ALICE, &event.id).await.unwrap();
    assert!(current.check_invariants().is_ok());
}

#[tokio::test]
async fn event_chat_follows_membership() {
    let service = service();
    let event = service.create_event(ALICE, pickup_game(4)).await.unwrap();

    service.toggle_membership(BOB, &event.id).await.unwrap();
    service
        .send_event_message(BOB, &event.id, "bringing a spare ball")
        .await
        .unwrap();

    // non-members cannot read or write
    assert!(matches!(
        service.send_event_message(CAROL, &event.id, "hi").await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        service.list_event_messages(CAROL, &event.id).await,
        Err(EngineError::Forbidden(_))
    ));

    // a kicked member loses access, but their messages stay
    service
        .kick(ALICE, &event.id, &UserId::new("bob"))
        .await
        .unwrap();
    assert!(matches!(
        service.send_event_message(BOB, &event.id, "still here?").await,
        Err(EngineError::Forbidden(_))
    ));
    let messages = service.list_event_messages(ALICE, &event.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender_name, "Bob");
}

#[tokio::test]
async fn friend_request_round_trip_leaves_no_residue() {
    let service = service();
    let bob = UserId::new("bob");
    let alice = UserId::new("alice");

    service.send_friend_request(ALICE, &bob).await.unwrap();

    let incoming = service.list_incoming_requests(BOB).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].sender_name, "Alice");
    let outgoing = service.list_outgoing_requests(ALICE).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].name, "Bob");

    service.accept_friend_request(BOB, &alice).await.unwrap();

    // both sides list the friendship, neither lists a pending request
    let alice_friends = service.list_friends(ALICE).await.unwrap();
    assert_eq!(alice_friends.len(), 1);
    assert_eq!(alice_friends[0].name, "Bob");
    let bob_friends = service.list_friends(BOB).await.unwrap();
    assert_eq!(bob_friends.len(), 1);
    assert_eq!(bob_friends[0].name, "Alice");
    assert!(service.list_incoming_requests(BOB).await.unwrap().is_empty());
    assert!(service.list_outgoing_requests(ALICE).await.unwrap().is_empty());

    // a repeat request is rejected while the friendship stands
    assert!(matches!(
        service.send_friend_request(ALICE, &bob).await,
        Err(EngineError::Conflict(_))
    ));

    service.remove_friend(BOB, &alice).await.unwrap();
    assert!(service.list_friends(ALICE).await.unwrap().is_empty());
    assert!(service.list_friends(BOB).await.unwrap().is_empty());
}

#[tokio::test]
async fn friend_listing_shows_event_activity() {
    let service = service();
    let bob = UserId::new("bob");

    service.send_friend_request(ALICE, &bob).await.unwrap();
    service
        .accept_friend_request(BOB, &UserId::new("alice"))
        .await
        .unwrap();

    let before = service.list_friends(ALICE).await.unwrap();
    assert_eq!(before[0].active_event, None);

    let event = service.create_event(BOB, pickup_game(4)).await.unwrap();
    let after = service.list_friends(ALICE).await.unwrap();
    assert_eq!(after[0].active_event.as_deref(), Some(event.title.as_str()));
}

#[tokio::test]
async fn reject_and_cancel_clear_pending_state() {
    let service = service();
    let bob = UserId::new("bob");
    let alice = UserId::new("alice");

    service.send_friend_request(ALICE, &bob).await.unwrap();
    service.reject_friend_request(BOB, &alice).await.unwrap();
    assert!(service.list_incoming_requests(BOB).await.unwrap().is_empty());
    assert!(service.list_outgoing_requests(ALICE).await.unwrap().is_empty());

    // rejection is not a ban; alice can try again and withdraw herself
    service.send_friend_request(ALICE, &bob).await.unwrap();
    service.cancel_friend_request(ALICE, &bob).await.unwrap();
    assert!(service.list_incoming_requests(BOB).await.unwrap().is_empty());
    assert!(service.list_outgoing_requests(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn direct_chat_is_symmetric_between_participants() {
    let service = service();
    let bob = UserId::new("bob");
    let alice = UserId::new("alice");

    service
        .send_direct_message(ALICE, &bob, "lab at 4?")
        .await
        .unwrap();
    service
        .send_direct_message(BOB, &alice, "works for me")
        .await
        .unwrap();

    // both ends read the same stream in the same order
    let from_alice = service.list_direct_messages(ALICE, &bob).await.unwrap();
    let from_bob = service.list_direct_messages(BOB, &alice).await.unwrap();
    assert_eq!(from_alice, from_bob);
    assert_eq!(from_alice.len(), 2);
    assert!(from_alice[0].timestamp <= from_alice[1].timestamp);
}

#[tokio::test]
async fn reconcile_reports_clean_after_normal_operations() {
    let service = service();
    let bob = UserId::new("bob");

    service.send_friend_request(ALICE, &bob).await.unwrap();
    service
        .accept_friend_request(BOB, &UserId::new("alice"))
        .await
        .unwrap();

    assert!(service.reconcile(ALICE).await.unwrap().is_clean());
    assert!(service.reconcile(BOB).await.unwrap().is_clean());
}

#[tokio::test]
async fn every_operation_rejects_unknown_tokens() {
    let service = service();
    let event = service.create_event(ALICE, pickup_game(4)).await.unwrap();

    let bad = "tok-mallory";
    assert!(matches!(
        service.toggle_membership(bad, &event.id).await,
        Err(EngineError::Unauthenticated)
    ));
    assert!(matches!(
        service.send_friend_request(bad, &UserId::new("bob")).await,
        Err(EngineError::Unauthenticated)
    ));
    assert!(matches!(
        service.send_direct_message(bad, &UserId::new("bob"), "hi").await,
        Err(EngineError::Unauthenticated)
    ));
    assert!(matches!(
        service.list_event_messages(bad, &event.id).await,
        Err(EngineError::Unauthenticated)
    ));
}
