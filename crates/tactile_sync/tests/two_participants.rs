//! Integration tests for mirroring presses between participants
//!
//! Two participants share one in-process store. Each composes its own grid
//! from the same participants list seen from its own identity, then:
//! 1. A button press on one side is published to the channel
//! 2. The other side drains its queue on the next frame
//! 3. The matching remote mirror moves to its pressed depth

use std::sync::Arc;
use std::thread;

use tactile_core::{
    compose_grid, GridPattern, GridProfile, ObjectKey, Peer, Role, SessionContext, TransitionSettings, World,
};
use tactile_sync::{MemoryStore, SyncChannel};

fn participant(identity: &str, other: &str, pattern: &GridPattern) -> World {
    let session = SessionContext::new(identity, identity, vec![Peer::new(other, other)]);
    let grid = GridProfile { rows: 1, cols: 2, ..GridProfile::default() };
    let mut world = World::new();
    compose_grid(&mut world, &grid, pattern, &session, TransitionSettings::default());
    world
}

fn button_for(world: &World, target: &str) -> ObjectKey {
    world
        .objects()
        .find(|(_, o)| matches!(o.role(), Role::Button { target: t } if t == target))
        .map(|(key, _)| key)
        .unwrap()
}

fn mirror_of(world: &World, uid: &str) -> ObjectKey {
    world.objects_with_uid(uid)[0]
}

fn settle(world: &mut World) {
    for _ in 0..100 {
        world.update_transitions(1.0 / 60.0);
    }
}

#[test]
fn test_press_is_mirrored_on_peer() {
    let store = MemoryStore::new();
    let pattern = GridPattern::from_rows(vec![vec![1, 0]]);

    let mut alice = participant("alice", "bob", &pattern);
    let mut bob = participant("bob", "alice", &pattern);

    let mut alice_channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "alice");
    let mut bob_channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "bob");
    alice_channel.subscribe().unwrap();
    bob_channel.subscribe().unwrap();
    assert_eq!(alice_channel.drain(&mut alice).unwrap(), 0);
    assert_eq!(bob_channel.drain(&mut bob).unwrap(), 0);

    // Bob presses the button addressed to Alice
    let key = button_for(&bob, "alice");
    assert!(bob.get_mut(key).unwrap().toggle_press(&mut bob_channel));

    assert_eq!(alice_channel.drain(&mut alice).unwrap(), 1);
    // Bob sees his own write, but it is not addressed to him
    assert_eq!(bob_channel.drain(&mut bob).unwrap(), 0);

    settle(&mut alice);
    let mirror = alice.get(mirror_of(&alice, "bob")).unwrap();
    assert!(mirror.is_pressed());
    assert_eq!(mirror.visual_offset(), -2.0);

    // Releasing restores the mirror
    assert!(bob.get_mut(key).unwrap().toggle_press(&mut bob_channel));
    assert_eq!(alice_channel.drain(&mut alice).unwrap(), 1);
    settle(&mut alice);
    let mirror = alice.get(mirror_of(&alice, "bob")).unwrap();
    assert!(!mirror.is_pressed());
    assert_eq!(mirror.visual_offset(), -1.0);
}

#[test]
fn test_late_subscriber_ignores_existing_state() {
    let store = MemoryStore::new();
    let pattern = GridPattern::from_rows(vec![vec![1, 0]]);

    let mut bob = participant("bob", "alice", &pattern);
    let mut bob_channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "bob");
    let key = button_for(&bob, "alice");
    bob.get_mut(key).unwrap().toggle_press(&mut bob_channel);

    let mut alice = participant("alice", "bob", &pattern);
    let mut alice_channel = SyncChannel::new(Arc::new(store), "buttons", "alice");
    alice_channel.subscribe().unwrap();

    assert_eq!(alice_channel.drain(&mut alice).unwrap(), 0);
    assert!(!alice.get(mirror_of(&alice, "bob")).unwrap().is_pressed());
}

#[test]
fn test_deliveries_from_another_thread() {
    let store = MemoryStore::new();
    let pattern = GridPattern::from_rows(vec![vec![1, 0]]);

    let mut alice = participant("alice", "bob", &pattern);
    let mut alice_channel = SyncChannel::new(Arc::new(store.clone()), "buttons", "alice");
    alice_channel.subscribe().unwrap();
    alice_channel.drain(&mut alice).unwrap();

    let writer = store.clone();
    thread::spawn(move || {
        let mut bob = participant("bob", "alice", &pattern);
        let mut bob_channel = SyncChannel::new(Arc::new(writer), "buttons", "bob");
        let key = button_for(&bob, "alice");
        bob.get_mut(key).unwrap().toggle_press(&mut bob_channel);
    })
    .join()
    .unwrap();

    // Nothing is applied until the frame drains the queue
    assert!(!alice.get(mirror_of(&alice, "bob")).unwrap().is_pressed());
    assert_eq!(alice_channel.drain(&mut alice).unwrap(), 1);
    assert!(alice.get(mirror_of(&alice, "bob")).unwrap().is_pressed());
}
