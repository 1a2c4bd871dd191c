use std::collections::{BTreeMap, BTreeSet};

use crate::{attribute::AttributeValue, scene::BroadcastSettings};

/// Handle to a node in the [`SceneGraph`].
///
/// [`SceneGraph`]: crate::scene::SceneGraph
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NodeId(pub(crate) u64);

/// A locally-instantiated scene entity: an attribute bag plus its place in
/// the parent/child hierarchy, and optionally the broadcast configuration
/// that marks it as locally owned.
pub struct SceneNode {
    pub(crate) attributes: BTreeMap<String, AttributeValue>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: BTreeSet<NodeId>,
    pub(crate) broadcast: Option<BroadcastSettings>,
}

impl SceneNode {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            attributes: BTreeMap::new(),
            parent,
            children: BTreeSet::new(),
            broadcast: None,
        }
    }
}
