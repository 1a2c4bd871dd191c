use std::fmt;

/// Monotonic timestamp carried by the host clock signal, in the host's own
/// time units. Only differences are ever taken, so the epoch is irrelevant.
pub type TickTime = f64;

/// Opaque, store-assigned entity key.
///
/// Ids are allocated by the remote store (`RemoteStore::create_id`) and are
/// never reused while any local reference to them is live.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EntityId(String);

impl EntityId {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
