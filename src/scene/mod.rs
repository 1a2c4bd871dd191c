pub mod broadcast;
pub mod graph;
pub mod node;

pub use broadcast::BroadcastSettings;
pub use graph::SceneGraph;
pub use node::{NodeId, SceneNode};
