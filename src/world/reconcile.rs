//! # Reconcile engine
//!
//! Consumes the drained stream of [`StoreEvent`]s plus the one-shot startup
//! snapshot, and drives the [`LocalMirror`] into agreement with the remote
//! entities collection, for every entity this client does not own.
//!
//! Three rules shape every handler:
//! 1. **Self-echo suppression.** The store fans a client's own writes back
//!    to it. Any event whose id is in the owned set is dropped before it can
//!    touch local state.
//! 2. **Idempotence.** Delivery is at-least-once; membership checks against
//!    the mirror absorb duplicates.
//! 3. **Tolerance.** A malformed record is applied best-effort, an
//!    unresolvable parent is deferred, and no single event can halt
//!    processing of the ones behind it.

use log::{info, warn};

use crate::{
    attribute::AttributeAddress,
    record::EntityRecord,
    scene::{NodeId, SceneGraph},
    store::StoreEvent,
    types::EntityId,
    world::{mirror::LocalMirror, ownership::OwnershipRegistry, pending::ParentWaitlist},
};

pub struct ReconcileEngine {
    pending_parents: ParentWaitlist,
}

impl ReconcileEngine {
    pub fn new() -> Self {
        Self {
            pending_parents: ParentWaitlist::new(),
        }
    }

    /// Startup pass over the `read_all` snapshot. Every id not already owned
    /// is routed through the add path; owned ids are skipped because an
    /// entity's own freshly-created record races with the snapshot read and
    /// must not be mirrored back onto its owner.
    pub fn initial_sync<I>(
        &mut self,
        snapshot: I,
        mirror: &mut LocalMirror,
        ownership: &OwnershipRegistry,
        scene: &mut SceneGraph,
    ) where
        I: IntoIterator<Item = (EntityId, EntityRecord)>,
    {
        for (id, record) in snapshot {
            if ownership.is_owned(&id) {
                continue;
            }
            self.on_added(id, record, mirror, ownership, scene);
        }
    }

    /// Drains a batch of store events into the mirror, in arrival order.
    pub fn process_events(
        &mut self,
        events: Vec<StoreEvent>,
        mirror: &mut LocalMirror,
        ownership: &OwnershipRegistry,
        scene: &mut SceneGraph,
    ) {
        for event in events {
            match event {
                StoreEvent::Added(id, record) => {
                    self.on_added(id, record, mirror, ownership, scene)
                }
                StoreEvent::Changed(id, record) => {
                    self.on_changed(id, record, mirror, ownership, scene)
                }
                StoreEvent::Removed(id) => self.on_removed(id, mirror, scene),
            }
        }
    }

    /// A new entity appeared remotely. Instantiates a node for it, under its
    /// parent's node when the parent is already mirrored, else under the
    /// root. A child arriving before its parent is additionally queued for
    /// re-parenting on the parent's later arrival.
    pub fn on_added(
        &mut self,
        id: EntityId,
        record: EntityRecord,
        mirror: &mut LocalMirror,
        ownership: &OwnershipRegistry,
        scene: &mut SceneGraph,
    ) {
        // at-least-once delivery, and the owner's own create echoes back
        if mirror.contains(&id) || ownership.is_owned(&id) {
            return;
        }

        let resolved_parent = record
            .parent_id
            .as_ref()
            .and_then(|parent_id| mirror.node_of(parent_id));
        let attach_under = resolved_parent.unwrap_or(scene.root());
        let node = scene.spawn_node(attach_under);

        Self::apply_attributes(&record, node, scene);
        mirror.insert(id.clone(), node);

        if let Some(parent_id) = &record.parent_id {
            if resolved_parent.is_none() {
                self.pending_parents.queue(parent_id.clone(), id.clone());
            }
        }

        self.adopt_waiters(&id, node, mirror, scene);
    }

    /// An entity this client does not own changed remotely. Applies the
    /// partial record to the mirrored node. Changes for owned ids are the
    /// classic self-echo and are dropped whole.
    pub fn on_changed(
        &mut self,
        id: EntityId,
        record: EntityRecord,
        mirror: &mut LocalMirror,
        ownership: &OwnershipRegistry,
        scene: &mut SceneGraph,
    ) {
        if ownership.is_owned(&id) {
            return;
        }
        let Some(node) = mirror.node_of(&id) else {
            warn!("change for unmirrored entity {}", id);
            return;
        };
        Self::apply_attributes(&record, node, scene);
    }

    /// An entity disappeared remotely. Destroys its node and mirror entry;
    /// ids never seen (or already removed) are a no-op.
    pub fn on_removed(&mut self, id: EntityId, mirror: &mut LocalMirror, scene: &mut SceneGraph) {
        let Some(node) = mirror.remove(&id) else {
            return;
        };
        self.pending_parents.remove_child(&id);
        scene.despawn_node(node);
    }

    /// How many children are currently parked waiting for a parent.
    pub fn pending_parent_count(&self) -> usize {
        self.pending_parents.len()
    }

    // Applies every attribute of the record except the parent reference,
    // decomposing composite names into sub-field writes.
    fn apply_attributes(record: &EntityRecord, node: NodeId, scene: &mut SceneGraph) {
        for (name, value) in record.attributes() {
            let address = AttributeAddress::parse(name);
            scene.set_attribute(node, &address, value.clone());
        }
    }

    // Re-parents every child that was waiting on the entity that just
    // arrived.
    fn adopt_waiters(
        &mut self,
        parent_id: &EntityId,
        parent_node: NodeId,
        mirror: &LocalMirror,
        scene: &mut SceneGraph,
    ) {
        for child_id in self.pending_parents.take_ready(parent_id) {
            let Some(child_node) = mirror.node_of(&child_id) else {
                continue;
            };
            info!("re-parenting {} under late-arriving parent {}", child_id, parent_id);
            scene.attach(child_node, parent_node);
        }
    }
}

impl Default for ReconcileEngine {
    fn default() -> Self {
        Self::new()
    }
}
