//! # Mirror Sync
//! Keeps a pool of interactive scene entities consistent across clients that
//! share a remote key-value/pub-sub store. Each client exclusively owns the
//! entities it broadcasts and mirrors every entity broadcast by its peers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod attribute;
mod client;
mod config;
mod error;
mod record;
mod scene;
mod store;
mod types;
mod world;

pub use attribute::{AttributeAddress, AttributeValue};
pub use client::MirrorClient;
pub use config::SyncConfig;
pub use error::{StoreError, SyncError};
pub use record::EntityRecord;
pub use scene::{BroadcastSettings, NodeId, SceneGraph, SceneNode};
pub use store::{MemoryServer, MemoryStore, RemoteStore, StoreEvent};
pub use types::{EntityId, TickTime};
pub use world::{
    BroadcastScheduler, LocalMirror, OwnershipRegistry, ParentWaitlist, ReconcileEngine,
};
