//! Raw video frames
//!
//! Frames are packed BGR (3 bytes per pixel) as produced by typical capture
//! sources. The payload is `bytes::Bytes`, so cloning a frame for fan-out
//! only bumps a reference count.

pub mod raw;
pub mod scale;

pub use raw::RawFrame;
pub use scale::scale_nearest;
