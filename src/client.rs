//! # Client facade
//!
//! Wires a [`RemoteStore`] handle, the [`SceneGraph`] and the three world
//! subsystems into one single-threaded unit of control. All engine state is
//! owned here and mutated only from the caller's thread, from three entry
//! points: [`connect`] (once, at startup), [`frame`] (every host tick) and
//! [`register_broadcast`] (when a local entity starts broadcasting).
//!
//! [`connect`]: MirrorClient::connect
//! [`frame`]: MirrorClient::frame
//! [`register_broadcast`]: MirrorClient::register_broadcast

use log::warn;

use crate::{
    config::SyncConfig,
    error::SyncError,
    scene::{BroadcastSettings, NodeId, SceneGraph},
    store::RemoteStore,
    types::{EntityId, TickTime},
    world::{BroadcastScheduler, LocalMirror, OwnershipRegistry, ReconcileEngine},
};

pub struct MirrorClient<S: RemoteStore> {
    store: S,
    scene: SceneGraph,
    mirror: LocalMirror,
    ownership: OwnershipRegistry,
    reconcile: ReconcileEngine,
    broadcast: BroadcastScheduler,
}

impl<S: RemoteStore> MirrorClient<S> {
    /// Builds a client over an already-opened store handle. The handle is
    /// expected to be scoped to the session's channel by whoever opened it.
    pub fn new(config: &SyncConfig, store: S) -> Self {
        Self {
            store,
            scene: SceneGraph::new(),
            mirror: LocalMirror::new(),
            ownership: OwnershipRegistry::new(),
            reconcile: ReconcileEngine::new(),
            broadcast: BroadcastScheduler::new(config),
        }
    }

    /// Startup path: performs the one-shot snapshot read and mirrors every
    /// entity already present. This is the only store call the client waits
    /// on inline.
    pub fn connect(&mut self) -> Result<(), SyncError> {
        let snapshot = self.store.read_all()?;
        self.reconcile
            .initial_sync(snapshot, &mut self.mirror, &self.ownership, &mut self.scene);
        Ok(())
    }

    /// One host clock tick: drain inbound notifications into the mirror,
    /// then run the outbound publish pass. Neither half blocks on the store.
    pub fn frame(&mut self, now: TickTime) {
        let events = self.store.drain_events();
        self.reconcile
            .process_events(events, &mut self.mirror, &self.ownership, &mut self.scene);
        self.broadcast
            .tick(now, &mut self.store, &self.ownership, &self.scene);
    }

    /// Marks a scene node as locally owned and broadcasting. Returns the
    /// store-assigned id, or `None` when the settings carry no per-tick
    /// attributes (such a node has nothing to broadcast and is not
    /// registered).
    pub fn register_broadcast(
        &mut self,
        node: NodeId,
        settings: BroadcastSettings,
    ) -> Result<Option<EntityId>, SyncError> {
        if settings.attributes.is_empty() {
            return Ok(None);
        }
        if !self.scene.contains(node) {
            return Err(SyncError::NodeNotFound { node });
        }
        let id = self.ownership.register_local(&mut self.store, node)?;
        self.scene.set_broadcast_settings(node, settings);
        Ok(Some(id))
    }

    /// Graceful teardown: best-effort deletion of every owned entity, then
    /// the store disconnect. The store-side remove-on-disconnect registered
    /// at ownership time covers the non-graceful paths.
    pub fn disconnect(&mut self) {
        for id in self.ownership.drain() {
            if let Err(error) = self.store.remove(&id) {
                warn!("teardown removal of {} failed: {}", id, error);
            }
        }
        self.store.disconnect();
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn is_owned(&self, id: &EntityId) -> bool {
        self.ownership.is_owned(id)
    }

    /// The scene node mirroring a remotely-owned entity, if present.
    pub fn mirrored_node(&self, id: &EntityId) -> Option<NodeId> {
        self.mirror.node_of(id)
    }

    pub fn mirrored_count(&self) -> usize {
        self.mirror.len()
    }

    pub fn owned_count(&self) -> usize {
        self.ownership.len()
    }
}
