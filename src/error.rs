use thiserror::Error;

use crate::{scene::NodeId, types::EntityId};

/// Errors surfaced by the remote store adapter boundary.
///
/// Network loss, auth failure and the like are collapsed into these by the
/// adapter implementation; the sync engine itself treats every one of them as
/// non-fatal (log, skip, retry next opportunity).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The handle's connection to the store has been torn down. No further
    /// reads, writes or events will go through it.
    #[error("store handle is disconnected")]
    Disconnected,

    /// Backend-specific failure the adapter could not recover from.
    #[error("store backend failure: {message}")]
    Backend { message: String },
}

/// Errors that can occur during entity registration and client wiring.
///
/// Nothing in the reconcile or broadcast paths returns these; those paths
/// absorb bad input per the tolerance rules (duplicate events are idempotent
/// no-ops, unresolved parents are deferred, malformed records are applied
/// best-effort).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// A scene node was registered for broadcast a second time.
    #[error("node {node:?} is already broadcasting under id {id}")]
    AlreadyRegistered { node: NodeId, id: EntityId },

    /// A scene node referenced by the caller does not exist in the graph.
    #[error("node {node:?} does not exist in the scene graph")]
    NodeNotFound { node: NodeId },

    /// Adapter-level failure during a registration or startup call.
    #[error(transparent)]
    Store(#[from] StoreError),
}
