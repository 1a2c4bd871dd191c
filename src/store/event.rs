use crate::{record::EntityRecord, types::EntityId};

/// Entity lifecycle notifications from the remote store.
///
/// Delivery is at-least-once, in arbitrary order between entities, with no
/// backpressure signal. `Changed` carries the partial record that was
/// written, not the merged result.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    Added(EntityId, EntityRecord),
    Changed(EntityId, EntityRecord),
    Removed(EntityId),
}

impl StoreEvent {
    pub fn entity(&self) -> &EntityId {
        match self {
            Self::Added(id, _) => id,
            Self::Changed(id, _) => id,
            Self::Removed(id) => id,
        }
    }
}
