use std::collections::HashMap;

use crate::{error::StoreError, record::EntityRecord, store::StoreEvent, types::EntityId};

/// Abstract contract over the remote entity store.
///
/// Transport, authentication and subscription mechanics live behind this
/// boundary. Notifications are modeled as a queue the engine drains on its
/// own control thread rather than as callbacks, so the ordering-agnostic
/// semantics stay testable without a live connection.
///
/// All write calls are fire-and-forget from the engine's perspective; only
/// [`read_all`] is awaited inline, once, on the startup path.
///
/// [`read_all`]: RemoteStore::read_all
pub trait RemoteStore {
    /// One-shot snapshot of the entities collection.
    fn read_all(&mut self) -> Result<HashMap<EntityId, EntityRecord>, StoreError>;

    /// Allocates a fresh unique key without writing a value.
    fn create_id(&mut self) -> Result<EntityId, StoreError>;

    /// Merges `record` into the entity at `id`, creating it if absent.
    /// Non-destructive to fields the record does not name.
    fn update(&mut self, id: &EntityId, record: EntityRecord) -> Result<(), StoreError>;

    /// Explicitly deletes the entity at `id`. Deleting an absent id is not
    /// an error.
    fn remove(&mut self, id: &EntityId) -> Result<(), StoreError>;

    /// Registers a durable server-side deletion of `id` for when this
    /// client's connection is lost, independent of graceful shutdown.
    fn remove_on_disconnect(&mut self, id: &EntityId) -> Result<(), StoreError>;

    /// Takes every notification received since the last drain. May include
    /// echoes of this client's own writes; suppression is the engine's job.
    fn drain_events(&mut self) -> Vec<StoreEvent>;

    /// Tears down the connection, firing any registered remove-on-disconnect
    /// actions. Idempotent.
    fn disconnect(&mut self);
}
