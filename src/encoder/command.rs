//! Encoder command-line construction
//!
//! Builds the fixed ffmpeg invocation: rawvideo on stdin, H.264 + AAC in an
//! FLV container to the ingest URL. The geometry and rate arguments come
//! from the destination's [`StreamConfig`]; everything else is pinned for
//! low-latency live output.

use crate::config::{RelayConfig, StreamConfig};

/// Encoder preset pinned for live output
const PRESET: &str = "veryfast";
/// Latency tune pinned for live output
const TUNE: &str = "zerolatency";
/// GOP length in seconds of frames
const GOP_SECONDS: u32 = 2;

/// A fully resolved encoder invocation
#[derive(Debug, Clone)]
pub struct EncoderCommand {
    /// Binary to spawn
    pub program: String,
    /// Argument vector, ingest URL last
    pub args: Vec<String>,
}

impl EncoderCommand {
    /// Build the invocation for one destination
    ///
    /// `ingest_url` must already be resolved (it embeds the stream key, so
    /// the command is never logged verbatim).
    pub fn build(relay: &RelayConfig, stream: &StreamConfig, ingest_url: &str) -> Self {
        let gop = stream.fps * GOP_SECONDS;

        let args = vec![
            // Input: raw frames over stdin
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            relay.pixel_format.clone(),
            "-s".into(),
            stream.resolution.to_string(),
            "-r".into(),
            stream.fps.to_string(),
            "-i".into(),
            "-".into(),
            // Silent audio track; platforms reject video-only ingest
            "-f".into(),
            "lavfi".into(),
            "-i".into(),
            "anullsrc=channel_layout=stereo:sample_rate=44100".into(),
            // Video encoding
            "-c:v".into(),
            stream.video_codec.clone(),
            "-preset".into(),
            PRESET.into(),
            "-tune".into(),
            TUNE.into(),
            "-b:v".into(),
            format!("{}k", stream.bitrate_kbps),
            "-maxrate".into(),
            format!("{}k", stream.bitrate_kbps),
            "-bufsize".into(),
            format!("{}k", stream.bitrate_kbps * 2),
            "-g".into(),
            gop.to_string(),
            "-keyint_min".into(),
            stream.fps.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            // Audio encoding
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            format!("{}k", stream.audio_bitrate_kbps),
            "-ar".into(),
            "44100".into(),
            // Container and destination
            "-f".into(),
            "flv".into(),
            ingest_url.into(),
        ];

        Self {
            program: relay.encoder_binary.clone(),
            args,
        }
    }
}
