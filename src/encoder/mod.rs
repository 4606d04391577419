//! External encoder subprocess management
//!
//! The crate never speaks RTMP itself; each outlet drives one encoder
//! subprocess (ffmpeg by default) that reads raw frames on stdin and
//! publishes an FLV stream to the platform's ingest URL.

pub mod command;
pub mod process;

pub use command::EncoderCommand;
pub use process::EncoderProcess;
