use std::collections::BTreeMap;

use crate::{attribute::AttributeValue, types::EntityId};

/// An entity record as stored remotely: a map from attribute name to value,
/// plus an optional reference to a parent entity.
///
/// Attribute names may be composite (`"material|color"`); the store treats
/// such names as opaque keys, and they are decomposed only when applied to
/// or read from a scene node.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EntityRecord {
    pub parent_id: Option<EntityId>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl EntityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<S: Into<String>, V: Into<AttributeValue>>(&mut self, name: S, value: V) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.attributes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_id.is_none() && self.attributes.is_empty()
    }

    /// Store-side update semantics: merge `update` into `self` field-wise,
    /// leaving fields the update does not name untouched.
    pub fn merge(&mut self, update: &EntityRecord) {
        if let Some(parent_id) = &update.parent_id {
            self.parent_id = Some(parent_id.clone());
        }
        for (name, value) in &update.attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
    }
}
