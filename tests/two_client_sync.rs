// End-to-end: two clients sharing one in-process store deployment.

use mirror_sync::{
    AttributeAddress, AttributeValue, BroadcastSettings, MemoryServer, MemoryStore, MirrorClient,
    SyncConfig,
};

fn client(server: &MemoryServer, channel: &str) -> MirrorClient<MemoryStore> {
    let config = SyncConfig::new(channel, 10.0);
    let mut client = MirrorClient::new(&config, server.open(channel));
    client.connect().unwrap();
    client
}

fn settings(always: &[&str], once: &[&str]) -> BroadcastSettings {
    BroadcastSettings::new(
        always.iter().map(|s| s.to_string()).collect(),
        once.iter().map(|s| s.to_string()).collect(),
    )
}

#[test]
fn broadcast_reaches_peer_but_not_self() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room");
    let mut bob = client(&server, "room");

    let root = alice.scene().root();
    let node = alice.scene_mut().spawn_node(root);
    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("1 2 3"),
    );
    let id = alice
        .register_broadcast(node, settings(&["position"], &[]))
        .unwrap()
        .unwrap();

    alice.frame(0.0);
    alice.frame(10.0);

    bob.frame(0.0);
    let mirrored = bob.mirrored_node(&id).unwrap();
    assert_eq!(
        bob.scene().attribute(mirrored, &AttributeAddress::parse("position")),
        Some(&AttributeValue::from("1 2 3"))
    );

    // alice's own write echoes back to her and must be absorbed
    alice.frame(20.0);
    assert_eq!(alice.mirrored_count(), 0);
    assert_eq!(alice.owned_count(), 1);
    assert!(alice.is_owned(&id));
}

#[test]
fn changes_converge_on_the_peer() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room");
    let mut bob = client(&server, "room");

    let root = alice.scene().root();
    let node = alice.scene_mut().spawn_node(root);
    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("0 0 0"),
    );
    let id = alice
        .register_broadcast(node, settings(&["position"], &[]))
        .unwrap()
        .unwrap();

    alice.frame(0.0);
    alice.frame(10.0);
    bob.frame(0.0);

    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("4 5 6"),
    );
    alice.frame(20.0);
    bob.frame(10.0);

    let mirrored = bob.mirrored_node(&id).unwrap();
    assert_eq!(
        bob.scene().attribute(mirrored, &AttributeAddress::parse("position")),
        Some(&AttributeValue::from("4 5 6"))
    );
    assert_eq!(bob.mirrored_count(), 1);
}

#[test]
fn parent_child_hierarchy_crosses_clients() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room");
    let mut bob = client(&server, "room");

    let root = alice.scene().root();
    let parent = alice.scene_mut().spawn_node(root);
    let child = alice.scene_mut().spawn_node(parent);
    alice.scene_mut().set_attribute(
        parent,
        &AttributeAddress::parse("position"),
        AttributeValue::from("0 0 0"),
    );
    alice.scene_mut().set_attribute(
        child,
        &AttributeAddress::parse("position"),
        AttributeValue::from("0 1 0"),
    );
    let parent_id = alice
        .register_broadcast(parent, settings(&["position"], &[]))
        .unwrap()
        .unwrap();
    let child_id = alice
        .register_broadcast(child, settings(&["position"], &[]))
        .unwrap()
        .unwrap();

    alice.frame(0.0);
    alice.frame(10.0);
    bob.frame(0.0);

    let mirrored_parent = bob.mirrored_node(&parent_id).unwrap();
    let mirrored_child = bob.mirrored_node(&child_id).unwrap();
    assert_eq!(bob.scene().parent_of(mirrored_child), Some(mirrored_parent));
}

#[test]
fn late_joiner_catches_up_from_snapshot() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room");

    let root = alice.scene().root();
    let node = alice.scene_mut().spawn_node(root);
    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("7 7 7"),
    );
    let id = alice
        .register_broadcast(node, settings(&["position"], &[]))
        .unwrap()
        .unwrap();
    alice.frame(0.0);
    alice.frame(10.0);

    // carol connects after the fact: the snapshot alone must mirror alice
    let mut carol = client(&server, "room");
    assert_eq!(carol.mirrored_count(), 1);
    let mirrored = carol.mirrored_node(&id).unwrap();
    assert_eq!(
        carol.scene().attribute(mirrored, &AttributeAddress::parse("position")),
        Some(&AttributeValue::from("7 7 7"))
    );
    carol.frame(0.0);
    assert_eq!(carol.mirrored_count(), 1);
}

#[test]
fn disconnect_cleans_up_on_peers() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room");
    let mut bob = client(&server, "room");

    let root = alice.scene().root();
    let node = alice.scene_mut().spawn_node(root);
    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("0 0 0"),
    );
    let id = alice
        .register_broadcast(node, settings(&["position"], &[]))
        .unwrap()
        .unwrap();
    alice.frame(0.0);
    alice.frame(10.0);
    bob.frame(0.0);
    assert!(bob.mirrored_node(&id).is_some());

    alice.disconnect();
    bob.frame(10.0);
    assert_eq!(bob.mirrored_count(), 0);
    assert!(bob.mirrored_node(&id).is_none());
    assert_eq!(server.entity_count("room"), 0);
}

#[test]
fn channels_do_not_leak_between_sessions() {
    let server = MemoryServer::new();
    let mut alice = client(&server, "room-a");
    let mut eve = client(&server, "room-b");

    let root = alice.scene().root();
    let node = alice.scene_mut().spawn_node(root);
    alice.scene_mut().set_attribute(
        node,
        &AttributeAddress::parse("position"),
        AttributeValue::from("0 0 0"),
    );
    alice
        .register_broadcast(node, settings(&["position"], &[]))
        .unwrap()
        .unwrap();
    alice.frame(0.0);
    alice.frame(10.0);

    eve.frame(0.0);
    assert_eq!(eve.mirrored_count(), 0);
    assert_eq!(server.entity_count("room-a"), 1);
    assert_eq!(server.entity_count("room-b"), 0);
}
