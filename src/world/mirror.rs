use std::collections::HashMap;

use log::warn;

use crate::{scene::NodeId, types::EntityId};

/// The local mirror: remote entity id to the scene node instantiated for it.
///
/// Holds exactly the entities this client reflects from remote owners. An id
/// present here is never simultaneously in the ownership registry's owned
/// set; the reconcile engine checks both before inserting.
pub struct LocalMirror {
    entries: HashMap<EntityId, NodeId>,
}

impl LocalMirror {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn node_of(&self, id: &EntityId) -> Option<NodeId> {
        self.entries.get(id).copied()
    }

    pub fn insert(&mut self, id: EntityId, node: NodeId) {
        if let Some(previous) = self.entries.insert(id.clone(), node) {
            // the engine's idempotence guard should make this unreachable
            warn!("mirror entry for {} replaced node {:?}", id, previous);
        }
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<NodeId> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &NodeId)> {
        self.entries.iter()
    }
}

impl Default for LocalMirror {
    fn default() -> Self {
        Self::new()
    }
}
