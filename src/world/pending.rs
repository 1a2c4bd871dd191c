use std::collections::{BTreeSet, HashMap};

use crate::types::EntityId;

/// Retry queue for children that arrived before their parent.
///
/// Remote event ordering does not guarantee parent-before-child delivery, so
/// a child whose parent is not yet mirrored attaches to the root and waits
/// here. When the parent finally shows up the engine collects the waiters
/// and re-parents them. Entries have no time-to-live: store ids are never
/// reused while referenced, so the only exits are the parent arriving or the
/// waiting child being removed.
pub struct ParentWaitlist {
    waiters_by_parent: HashMap<EntityId, BTreeSet<EntityId>>,
    parent_by_child: HashMap<EntityId, EntityId>,
}

impl ParentWaitlist {
    pub fn new() -> Self {
        Self {
            waiters_by_parent: HashMap::new(),
            parent_by_child: HashMap::new(),
        }
    }

    /// Queues `child` to be re-parented under `parent` once it arrives.
    /// A child waits on at most one parent; a later queue call replaces the
    /// earlier interest.
    pub fn queue(&mut self, parent: EntityId, child: EntityId) {
        self.remove_child(&child);
        self.waiters_by_parent
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        self.parent_by_child.insert(child, parent);
    }

    /// Collects every child waiting on `parent`, clearing their entries.
    pub fn take_ready(&mut self, parent: &EntityId) -> Vec<EntityId> {
        let Some(children) = self.waiters_by_parent.remove(parent) else {
            return Vec::new();
        };
        for child in &children {
            self.parent_by_child.remove(child);
        }
        children.into_iter().collect()
    }

    /// Drops a child's pending interest, if any. Called when the child
    /// itself is removed before its parent ever arrived.
    pub fn remove_child(&mut self, child: &EntityId) {
        let Some(parent) = self.parent_by_child.remove(child) else {
            return;
        };
        if let Some(children) = self.waiters_by_parent.get_mut(&parent) {
            children.remove(child);
            if children.is_empty() {
                self.waiters_by_parent.remove(&parent);
            }
        }
    }

    pub fn is_waiting(&self, child: &EntityId) -> bool {
        self.parent_by_child.contains_key(child)
    }

    pub fn len(&self) -> usize {
        self.parent_by_child.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_by_child.is_empty()
    }
}

impl Default for ParentWaitlist {
    fn default() -> Self {
        Self::new()
    }
}
