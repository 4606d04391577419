//! # restream
//!
//! Multi-platform live restream fan-out over external encoder processes.
//!
//! A [`RelayManager`] takes a feed of raw BGR frames and delivers it to any
//! number of streaming destinations (Twitch, YouTube, Facebook, custom RTMP)
//! by driving one encoder subprocess per enabled destination. The crate
//! never speaks RTMP itself; that is delegated entirely to the encoder
//! binary (ffmpeg by default).
//!
//! Design points:
//! - Bounded frame queue (default 60) with drop-on-full: latency is favored
//!   over completeness, as appropriate for live video.
//! - Bounded reconnect policy per destination (default 3 attempts); an
//!   exhausted outlet stops permanently until explicitly restarted.
//! - Sequential best-effort fan-out from a single dispatch task; no
//!   ordering guarantee across destinations.
//! - Reconfiguration while live is supported; the outlet map is guarded.
//!
//! # Example
//! ```no_run
//! use restream::{Platform, RawFrame, RelayConfig, RelayManager, Resolution, StreamConfig};
//!
//! # async fn example() -> restream::Result<()> {
//! let manager = RelayManager::new(RelayConfig::default());
//!
//! manager
//!     .set_config(
//!         StreamConfig::new(Platform::Twitch)
//!             .stream_key("live_123_secret")
//!             .enabled(true)
//!             .resolution(Resolution::new(1280, 720))
//!             .bitrate_kbps(2500),
//!     )
//!     .await?;
//!
//! manager.start().await?;
//!
//! // Feed frames from any thread; full queue drops, never blocks
//! let frame = RawFrame::black(Resolution::new(1280, 720));
//! manager.send_frame(frame);
//!
//! manager.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod outlet;
pub mod relay;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{Platform, RelayConfig, Resolution, StreamConfig};
pub use error::{ConfigError, Error, Result};
pub use frame::RawFrame;
pub use outlet::{OutletState, StreamOutlet};
pub use relay::RelayManager;
pub use stats::{OutletStats, RelayStats};
