pub mod broadcast;
pub mod mirror;
pub mod ownership;
pub mod pending;
pub mod reconcile;

mod tests;

pub use broadcast::BroadcastScheduler;
pub use mirror::LocalMirror;
pub use ownership::OwnershipRegistry;
pub use pending::ParentWaitlist;
pub use reconcile::ReconcileEngine;
