//! In-process implementation of the store contract.
//!
//! One [`MemoryServer`] stands in for a store deployment; each
//! [`MemoryStore`] handle opened from it is one client connection into one
//! channel. Behavior mirrors what the engine must tolerate from a real
//! store: every mutation fans out to *every* handle on the channel,
//! including the one that made it, so self-echo is exercised for real, and
//! remove-on-disconnect registrations fire whether the handle disconnects
//! gracefully or is simply dropped.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
};

use crate::{
    error::StoreError, record::EntityRecord, store::adapter::RemoteStore, store::StoreEvent,
    types::EntityId,
};

#[derive(Default)]
struct ClientState {
    queue: VecDeque<StoreEvent>,
    on_disconnect: HashSet<EntityId>,
}

#[derive(Default)]
struct ChannelState {
    entities: HashMap<EntityId, EntityRecord>,
    clients: HashMap<u64, ClientState>,
}

impl ChannelState {
    fn fanout(&mut self, event: StoreEvent) {
        for client in self.clients.values_mut() {
            client.queue.push_back(event.clone());
        }
    }
}

#[derive(Default)]
struct StoreShared {
    channels: HashMap<String, ChannelState>,
    next_key: u64,
    next_client: u64,
}

/// Handle factory standing in for a shared store deployment.
#[derive(Clone, Default)]
pub struct MemoryServer {
    shared: Rc<RefCell<StoreShared>>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a client connection into `channel`. Handles on different
    /// channels never see each other's entities or events.
    pub fn open(&self, channel: &str) -> MemoryStore {
        let mut shared = self.shared.borrow_mut();
        let client = shared.next_client;
        shared.next_client += 1;
        shared
            .channels
            .entry(channel.to_string())
            .or_default()
            .clients
            .insert(client, ClientState::default());
        MemoryStore {
            shared: self.shared.clone(),
            channel: channel.to_string(),
            client,
            connected: true,
        }
    }

    /// Count of live entity records in a channel, for test assertions.
    pub fn entity_count(&self, channel: &str) -> usize {
        self.shared
            .borrow()
            .channels
            .get(channel)
            .map_or(0, |state| state.entities.len())
    }

    /// Snapshot of a single record, for test assertions.
    pub fn record(&self, channel: &str, id: &EntityId) -> Option<EntityRecord> {
        self.shared
            .borrow()
            .channels
            .get(channel)
            .and_then(|state| state.entities.get(id))
            .cloned()
    }
}

/// One client connection into one channel of a [`MemoryServer`].
pub struct MemoryStore {
    shared: Rc<RefCell<StoreShared>>,
    channel: String,
    client: u64,
    connected: bool,
}

impl MemoryStore {
    fn check_connected(&self) -> Result<(), StoreError> {
        if self.connected {
            Ok(())
        } else {
            Err(StoreError::Disconnected)
        }
    }
}

impl RemoteStore for MemoryStore {
    fn read_all(&mut self) -> Result<HashMap<EntityId, EntityRecord>, StoreError> {
        self.check_connected()?;
        let shared = self.shared.borrow();
        Ok(shared
            .channels
            .get(&self.channel)
            .map(|state| state.entities.clone())
            .unwrap_or_default())
    }

    fn create_id(&mut self) -> Result<EntityId, StoreError> {
        self.check_connected()?;
        let mut shared = self.shared.borrow_mut();
        let key = shared.next_key;
        shared.next_key += 1;
        Ok(EntityId::new(format!("entity-{key}")))
    }

    fn update(&mut self, id: &EntityId, record: EntityRecord) -> Result<(), StoreError> {
        self.check_connected()?;
        let mut shared = self.shared.borrow_mut();
        let state = shared.channels.entry(self.channel.clone()).or_default();
        if let Some(existing) = state.entities.get_mut(id) {
            existing.merge(&record);
            state.fanout(StoreEvent::Changed(id.clone(), record));
        } else {
            state.entities.insert(id.clone(), record.clone());
            state.fanout(StoreEvent::Added(id.clone(), record));
        }
        Ok(())
    }

    fn remove(&mut self, id: &EntityId) -> Result<(), StoreError> {
        self.check_connected()?;
        let mut shared = self.shared.borrow_mut();
        let Some(state) = shared.channels.get_mut(&self.channel) else {
            return Ok(());
        };
        if state.entities.remove(id).is_some() {
            state.fanout(StoreEvent::Removed(id.clone()));
        }
        Ok(())
    }

    fn remove_on_disconnect(&mut self, id: &EntityId) -> Result<(), StoreError> {
        self.check_connected()?;
        let mut shared = self.shared.borrow_mut();
        if let Some(state) = shared.channels.get_mut(&self.channel) {
            if let Some(client) = state.clients.get_mut(&self.client) {
                client.on_disconnect.insert(id.clone());
            }
        }
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut shared = self.shared.borrow_mut();
        shared
            .channels
            .get_mut(&self.channel)
            .and_then(|state| state.clients.get_mut(&self.client))
            .map(|client| client.queue.drain(..).collect())
            .unwrap_or_default()
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        let mut shared = self.shared.borrow_mut();
        let Some(state) = shared.channels.get_mut(&self.channel) else {
            return;
        };
        let Some(client) = state.clients.remove(&self.client) else {
            return;
        };
        for id in client.on_disconnect {
            if state.entities.remove(&id).is_some() {
                state.fanout(StoreEvent::Removed(id));
            }
        }
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        // abnormal termination path: dropping the handle counts as losing
        // the connection, so registered removals still fire
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_creates_then_merges() {
        let server = MemoryServer::new();
        let mut store = server.open("default");

        let id = store.create_id().unwrap();
        let mut record = EntityRecord::new();
        record.set("position", "0 0 0");
        store.update(&id, record).unwrap();

        let mut partial = EntityRecord::new();
        partial.set("rotation", "0 90 0");
        store.update(&id, partial).unwrap();

        let stored = server.record("default", &id).unwrap();
        assert!(stored.get("position").is_some());
        assert!(stored.get("rotation").is_some());
    }

    #[test]
    fn events_fan_out_to_originator_too() {
        let server = MemoryServer::new();
        let mut store = server.open("default");

        let id = store.create_id().unwrap();
        store.update(&id, EntityRecord::new()).unwrap();

        let events = store.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StoreEvent::Added(added, _) if added == &id));
    }

    #[test]
    fn channels_are_isolated() {
        let server = MemoryServer::new();
        let mut red = server.open("red");
        let mut blue = server.open("blue");

        let id = red.create_id().unwrap();
        red.update(&id, EntityRecord::new()).unwrap();

        assert!(blue.drain_events().is_empty());
        assert!(blue.read_all().unwrap().is_empty());
        assert_eq!(server.entity_count("red"), 1);
    }

    #[test]
    fn drop_fires_remove_on_disconnect() {
        let server = MemoryServer::new();
        let mut peer = server.open("default");
        {
            let mut store = server.open("default");
            let id = store.create_id().unwrap();
            store.remove_on_disconnect(&id).unwrap();
            store.update(&id, EntityRecord::new()).unwrap();
        }
        let events = peer.drain_events();
        assert!(events.iter().any(|e| matches!(e, StoreEvent::Removed(_))));
        assert_eq!(server.entity_count("default"), 0);
    }
}
