//! Statistics for outlets and the relay

pub mod metrics;

pub use metrics::{OutletStats, RelayStats};
