/// Configuration surface consumed by the sync engine.
///
/// These are set once at startup and cloned into the client; no run-time
/// mutation is expected.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Channel/namespace identifier under the shared store. Two clients only
    /// see each other when they open the same channel, which lets independent
    /// sessions share one store deployment.
    pub channel: String,
    /// Minimum time between outbound publish passes, in [`TickTime`] units.
    /// Ticks arriving sooner than this since the last publish are skipped
    /// entirely, bounding write rate regardless of the host's frame rate.
    ///
    /// [`TickTime`]: crate::TickTime
    pub publish_interval: f64,
}

impl SyncConfig {
    pub fn new<S: Into<String>>(channel: S, publish_interval: f64) -> Self {
        Self {
            channel: channel.into(),
            publish_interval,
        }
    }

    /// Applies an external channel override (e.g. taken from a launch
    /// argument), which takes precedence over the configured channel.
    pub fn with_channel_override(mut self, channel: Option<String>) -> Self {
        if let Some(channel) = channel {
            self.channel = channel;
        }
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel: "default".to_string(),
            publish_interval: 10.0,
        }
    }
}
