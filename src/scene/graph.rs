use std::collections::HashMap;

use log::warn;

use crate::{
    attribute::{AttributeAddress, AttributeValue},
    scene::{BroadcastSettings, NodeId, SceneNode},
};

/// The host scene graph: an arena of [`SceneNode`]s under a permanent root.
///
/// This is the local ground truth the reconcile engine writes into and the
/// broadcast scheduler samples from. It knows nothing about the remote
/// store; all entity-id bookkeeping lives in the world subsystems.
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(None));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Creates a node attached under `parent`. A stale parent handle falls
    /// back to the root rather than failing the spawn.
    pub fn spawn_node(&mut self, parent: NodeId) -> NodeId {
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            warn!("spawn under nonexistent parent {:?}, attaching to root", parent);
            self.root
        };
        let node = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(node, SceneNode::new(Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(node);
        }
        node
    }

    /// Detaches and destroys `node`. Surviving children are re-attached to
    /// the root; each mirrored child has its own record remotely and will be
    /// destroyed by its own removal notification.
    pub fn despawn_node(&mut self, node: NodeId) {
        if node == self.root {
            warn!("attempted to despawn the scene root");
            return;
        }
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        if let Some(parent) = removed.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.remove(&node);
            }
        }
        let root = self.root;
        for child in removed.children {
            if let Some(child_node) = self.nodes.get_mut(&child) {
                child_node.parent = Some(root);
            }
            if let Some(root_node) = self.nodes.get_mut(&root) {
                root_node.children.insert(child);
            }
        }
    }

    /// Moves `node` under a new parent. No-op (with a warning) if either
    /// handle is stale.
    pub fn attach(&mut self, node: NodeId, parent: NodeId) {
        if node == self.root || node == parent {
            return;
        }
        if !self.nodes.contains_key(&parent) {
            warn!("attach to nonexistent parent {:?}", parent);
            return;
        }
        let Some(old_parent) = self.nodes.get(&node).and_then(|n| n.parent) else {
            warn!("attach of nonexistent node {:?}", node);
            return;
        };
        if let Some(old_parent_node) = self.nodes.get_mut(&old_parent) {
            old_parent_node.children.remove(&node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(node);
        }
    }

    /// The node's current parent; `None` for the root or a stale handle.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children_of(&self, node: NodeId) -> impl Iterator<Item = &NodeId> {
        self.nodes.get(&node).into_iter().flat_map(|n| n.children.iter())
    }

    /// Resolves an attribute address against the node's attribute bag.
    pub fn attribute(&self, node: NodeId, address: &AttributeAddress) -> Option<&AttributeValue> {
        let value = self.nodes.get(&node)?.attributes.get(address.attribute())?;
        match address.sub_field() {
            Some(field) => value.field(field),
            None => Some(value),
        }
    }

    /// Writes through an attribute address. A sub-field write into a
    /// primitive-valued attribute replaces it with a single-field structured
    /// value; a sub-field write into a structured value leaves its sibling
    /// fields untouched.
    pub fn set_attribute(&mut self, node: NodeId, address: &AttributeAddress, value: AttributeValue) {
        let Some(scene_node) = self.nodes.get_mut(&node) else {
            warn!("set_attribute on nonexistent node {:?}", node);
            return;
        };
        match address.sub_field() {
            None => {
                scene_node.attributes.insert(address.attribute().to_string(), value);
            }
            Some(field) => {
                let slot = scene_node
                    .attributes
                    .entry(address.attribute().to_string())
                    .or_insert_with(|| AttributeValue::Map(Default::default()));
                if !matches!(slot, AttributeValue::Map(_)) {
                    *slot = AttributeValue::Map(Default::default());
                }
                if let AttributeValue::Map(fields) = slot {
                    fields.insert(field.to_string(), value);
                }
            }
        }
    }

    pub fn set_broadcast_settings(&mut self, node: NodeId, settings: BroadcastSettings) {
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.broadcast = Some(settings);
        }
    }

    pub fn broadcast_settings(&self, node: NodeId) -> Option<&BroadcastSettings> {
        self.nodes.get(&node)?.broadcast.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // the root always exists
        self.nodes.len() <= 1
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn despawn_reattaches_children_to_root() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn_node(scene.root());
        let child = scene.spawn_node(parent);
        assert_eq!(scene.parent_of(child), Some(parent));

        scene.despawn_node(parent);
        assert!(!scene.contains(parent));
        assert_eq!(scene.parent_of(child), Some(scene.root()));
    }

    #[test]
    fn subfield_write_preserves_siblings() {
        let mut scene = SceneGraph::new();
        let node = scene.spawn_node(scene.root());
        scene.set_attribute(node, &AttributeAddress::parse("material|color"), "red".into());
        scene.set_attribute(node, &AttributeAddress::parse("material|metalness"), 0.5.into());
        scene.set_attribute(node, &AttributeAddress::parse("material|color"), "blue".into());

        assert_eq!(
            scene.attribute(node, &AttributeAddress::parse("material|color")),
            Some(&AttributeValue::from("blue"))
        );
        assert_eq!(
            scene.attribute(node, &AttributeAddress::parse("material|metalness")),
            Some(&AttributeValue::from(0.5))
        );
    }

    #[test]
    fn subfield_write_replaces_primitive() {
        let mut scene = SceneGraph::new();
        let node = scene.spawn_node(scene.root());
        scene.set_attribute(node, &AttributeAddress::parse("material"), "flat".into());
        scene.set_attribute(node, &AttributeAddress::parse("material|color"), "red".into());

        assert_eq!(
            scene.attribute(node, &AttributeAddress::parse("material|color")),
            Some(&AttributeValue::from("red"))
        );
    }

    #[test]
    fn attach_moves_between_parents() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn_node(scene.root());
        let b = scene.spawn_node(scene.root());
        let child = scene.spawn_node(a);

        scene.attach(child, b);
        assert_eq!(scene.parent_of(child), Some(b));
        assert!(scene.children_of(b).any(|c| *c == child));
        assert!(!scene.children_of(a).any(|c| *c == child));
    }
}
