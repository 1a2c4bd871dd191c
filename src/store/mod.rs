pub mod adapter;
pub mod event;
pub mod memory;

pub use adapter::RemoteStore;
pub use event::StoreEvent;
pub use memory::{MemoryServer, MemoryStore};
