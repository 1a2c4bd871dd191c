/// Per-entity broadcast configuration, read by the broadcast scheduler.
#[derive(Clone, Debug)]
pub struct BroadcastSettings {
    /// Attribute names published on every publish pass. Names may be
    /// composite (`"material|color"`).
    pub attributes: Vec<String>,
    /// Attribute names published only on the entity's first successful
    /// publish, then never again. For values assumed immutable after setup.
    pub attributes_once: Vec<String>,
}

impl BroadcastSettings {
    pub fn new(attributes: Vec<String>, attributes_once: Vec<String>) -> Self {
        Self {
            attributes,
            attributes_once,
        }
    }
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            attributes: vec!["position".to_string(), "rotation".to_string()],
            attributes_once: Vec::new(),
        }
    }
}
