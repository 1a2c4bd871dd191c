//! # Broadcast scheduler
//!
//! The outbound half of the engine: on each host clock tick, samples every
//! owned entity's configured attributes and pushes one update per entity to
//! the remote store, subject to a minimum publish interval.
//!
//! Two deferral rules mirror the inbound side's ordering tolerance:
//! an entity whose scene parent has not been registered yet (no assigned
//! remote id to reference) is skipped this tick and retried on the next,
//! and once-set attributes stay pending until the tick the entity actually
//! publishes, so a deferred first tick does not swallow them.

use std::collections::HashSet;

use log::warn;

use crate::{
    attribute::AttributeAddress,
    config::SyncConfig,
    record::EntityRecord,
    scene::SceneGraph,
    store::RemoteStore,
    types::{EntityId, TickTime},
    world::ownership::OwnershipRegistry,
};

pub struct BroadcastScheduler {
    publish_interval: f64,
    last_publish: Option<TickTime>,
    once_published: HashSet<EntityId>,
}

impl BroadcastScheduler {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            publish_interval: config.publish_interval,
            last_publish: None,
            once_published: HashSet::new(),
        }
    }

    /// One host clock tick. Skips the whole pass while the interval since
    /// the last publish has not elapsed, which bounds outbound write rate
    /// regardless of how fast the host ticks.
    pub fn tick<S: RemoteStore>(
        &mut self,
        now: TickTime,
        store: &mut S,
        ownership: &OwnershipRegistry,
        scene: &SceneGraph,
    ) {
        match self.last_publish {
            None => {
                // first tick only establishes the throttle baseline
                self.last_publish = Some(now);
                return;
            }
            Some(last) => {
                if now - last < self.publish_interval {
                    return;
                }
                self.last_publish = Some(now);
            }
        }

        for (id, node) in ownership.iter() {
            let Some(settings) = scene.broadcast_settings(*node) else {
                continue;
            };

            let mut record = EntityRecord::new();

            // parent gate: a non-root parent must itself be broadcasting
            // before this entity can reference it remotely
            if let Some(parent) = scene.parent_of(*node) {
                if parent != scene.root() {
                    let Some(parent_id) = ownership.id_of(parent) else {
                        continue;
                    };
                    record.parent_id = Some(parent_id.clone());
                }
            }

            let first_publish = !self.once_published.contains(id);
            let once_names = settings
                .attributes_once
                .iter()
                .filter(|_| first_publish);
            for name in settings.attributes.iter().chain(once_names) {
                let address = AttributeAddress::parse(name);
                if let Some(value) = scene.attribute(*node, &address) {
                    record.set(name.clone(), value.clone());
                }
            }
            if first_publish {
                self.once_published.insert(id.clone());
            }

            // fire-and-forget: a failed write is retried in substance on the
            // next publish pass, which re-samples current state anyway
            if let Err(error) = store.update(id, record) {
                warn!("publish of {} failed: {}", id, error);
            }
        }
    }
}
