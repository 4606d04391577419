//! Destination and relay configuration
//!
//! A [`StreamConfig`] describes one destination (platform, key, encoding
//! parameters). A [`RelayConfig`] carries the relay-wide tunables: queue
//! capacity, reconnect policy, and the encoder binary to drive.

pub mod platform;
pub mod relay;
pub mod stream;

pub use platform::Platform;
pub use relay::RelayConfig;
pub use stream::{Resolution, StreamConfig};
