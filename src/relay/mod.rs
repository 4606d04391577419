//! Frame fan-out relay
//!
//! The [`RelayManager`] owns the destination configs, the live outlet map,
//! a bounded frame queue, and a single dispatch task that forwards each
//! dequeued frame to every live outlet in turn.
//!
//! # Architecture
//!
//! ```text
//!   capture thread(s)
//!        │ send_frame() — sync, non-blocking, drop-on-full
//!        ▼
//!   FrameQueue (bounded, default 60)
//!        │
//!        ▼
//!   dispatch task ───► StreamOutlet(twitch)  ───► encoder stdin
//!        │       ───► StreamOutlet(youtube) ───► encoder stdin
//!        │       ───► StreamOutlet(custom)  ───► encoder stdin
//!        ▼
//!   watch shutdown signal
//! ```
//!
//! Fan-out is sequential and best-effort: there is no ordering guarantee
//! across destinations, and an outlet that exhausts its reconnect budget is
//! removed from the live set without affecting the others.

pub mod manager;
pub mod queue;

pub use manager::RelayManager;
pub use queue::FrameQueue;
