//! Relay-wide tunables

use std::time::Duration;

/// Relay configuration options
///
/// Defaults favor real-time behavior: a small bounded queue, a short
/// bounded reconnect policy, and a hard stop timeout.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Frame queue capacity; enqueueing on a full queue drops the frame
    pub queue_capacity: usize,

    /// Maximum consecutive reconnect attempts before an outlet stops permanently
    pub max_reconnect_attempts: u32,

    /// Delay between stopping a failed encoder and respawning it
    pub reconnect_delay: Duration,

    /// How long to wait for the encoder to exit before force-killing it
    pub stop_timeout: Duration,

    /// Encoder binary to spawn
    pub encoder_binary: String,

    /// Input pixel format announced to the encoder
    pub pixel_format: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 60,
            max_reconnect_attempts: 3,
            reconnect_delay: Duration::from_secs(2),
            stop_timeout: Duration::from_secs(5),
            encoder_binary: "ffmpeg".to_string(),
            pixel_format: "bgr24".to_string(),
        }
    }
}

impl RelayConfig {
    /// Set the frame queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the maximum reconnect attempts
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Set the reconnect delay
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the stop timeout
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Set the encoder binary
    pub fn encoder_binary(mut self, binary: impl Into<String>) -> Self {
        self.encoder_binary = binary.into();
        self
    }

    /// Set the input pixel format
    pub fn pixel_format(mut self, format: impl Into<String>) -> Self {
        self.pixel_format = format.into();
        self
    }
}
