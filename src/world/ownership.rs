use std::collections::{BTreeMap, HashMap};

use crate::{
    error::SyncError, scene::NodeId, store::RemoteStore, types::EntityId,
};

/// Exclusive source of truth for "is this entity mine to broadcast".
///
/// Both the reconcile engine and the broadcast scheduler consult this
/// registry; it is what keeps the two paths from double-handling an entity.
/// An id enters the owned set exactly once, at local registration, and
/// leaves it only at teardown. Durable cleanup on abnormal termination is
/// delegated to the store's remove-on-disconnect primitive at registration
/// time.
pub struct OwnershipRegistry {
    owned: BTreeMap<EntityId, NodeId>,
    by_node: HashMap<NodeId, EntityId>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self {
            owned: BTreeMap::new(),
            by_node: HashMap::new(),
        }
    }

    /// Marks `node` as locally owned: allocates a fresh id from the store,
    /// registers the durable disconnect cleanup for it, and records the
    /// ownership. At most once per node.
    pub fn register_local<S: RemoteStore>(
        &mut self,
        store: &mut S,
        node: NodeId,
    ) -> Result<EntityId, SyncError> {
        if let Some(id) = self.by_node.get(&node) {
            return Err(SyncError::AlreadyRegistered {
                node,
                id: id.clone(),
            });
        }
        let id = store.create_id()?;
        store.remove_on_disconnect(&id)?;
        self.owned.insert(id.clone(), node);
        self.by_node.insert(node, id.clone());
        Ok(id)
    }

    pub fn is_owned(&self, id: &EntityId) -> bool {
        self.owned.contains_key(id)
    }

    /// The assigned remote id of an owned node, if it has been registered.
    /// The broadcast scheduler uses this to resolve parent references.
    pub fn id_of(&self, node: NodeId) -> Option<&EntityId> {
        self.by_node.get(&node)
    }

    /// Owned entities in stable id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &NodeId)> {
        self.owned.iter()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Empties the registry at teardown, yielding every owned id.
    pub fn drain(&mut self) -> Vec<EntityId> {
        self.by_node.clear();
        let owned = std::mem::take(&mut self.owned);
        owned.into_keys().collect()
    }
}

impl Default for OwnershipRegistry {
    fn default() -> Self {
        Self::new()
    }
}
