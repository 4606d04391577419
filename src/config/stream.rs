//! Per-destination stream configuration

use std::str::FromStr;

use crate::error::ConfigError;

use super::platform::Platform;

/// Output frame dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Raw BGR payload size for one frame at this resolution
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());

        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for one streaming destination
///
/// Created with platform defaults and adjusted through the setters; there is
/// no dynamic field patching. The stream key is redacted from `Debug` output.
#[derive(Clone)]
pub struct StreamConfig {
    /// Destination platform
    pub platform: Platform,

    /// Per-platform secret stream key
    pub stream_key: String,

    /// Server URL, consulted for `Platform::Custom` only
    pub server_url: String,

    /// Whether this destination participates in `RelayManager::start`
    pub enabled: bool,

    /// Video bitrate in kbps
    pub bitrate_kbps: u32,

    /// Output resolution
    pub resolution: Resolution,

    /// Output frame rate
    pub fps: u32,

    /// Video encoder passed to the encoder binary
    pub video_codec: String,

    /// Audio bitrate in kbps
    pub audio_bitrate_kbps: u32,
}

impl StreamConfig {
    /// Create a disabled config with encoding defaults for `platform`
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            stream_key: String::new(),
            server_url: String::new(),
            enabled: false,
            bitrate_kbps: 4000,
            resolution: Resolution::new(1920, 1080),
            fps: 30,
            video_codec: "libx264".to_string(),
            audio_bitrate_kbps: 128,
        }
    }

    /// Set the stream key
    pub fn stream_key(mut self, key: impl Into<String>) -> Self {
        self.stream_key = key.into();
        self
    }

    /// Set the server URL (custom platform)
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Enable or disable this destination
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the video bitrate in kbps
    pub fn bitrate_kbps(mut self, kbps: u32) -> Self {
        self.bitrate_kbps = kbps;
        self
    }

    /// Set the output resolution
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the output frame rate
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Set the video codec name
    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = codec.into();
        self
    }

    /// Set the audio bitrate in kbps
    pub fn audio_bitrate_kbps(mut self, kbps: u32) -> Self {
        self.audio_bitrate_kbps = kbps;
        self
    }

    /// Whether this destination should be started by the relay
    pub fn is_startable(&self) -> bool {
        self.enabled && !self.stream_key.is_empty()
    }

    /// Resolve the publish URL for this destination
    pub fn ingest_url(&self) -> Result<String, ConfigError> {
        self.platform.ingest_url(&self.stream_key, &self.server_url)
    }
}

impl std::fmt::Debug for StreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConfig")
            .field("platform", &self.platform)
            .field("stream_key", &"<redacted>")
            .field("server_url", &self.server_url)
            .field("enabled", &self.enabled)
            .field("bitrate_kbps", &self.bitrate_kbps)
            .field("resolution", &self.resolution)
            .field("fps", &self.fps)
            .field("video_codec", &self.video_codec)
            .field("audio_bitrate_kbps", &self.audio_bitrate_kbps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StreamConfig::new(Platform::Twitch);

        assert_eq!(config.platform, Platform::Twitch);
        assert!(!config.enabled);
        assert!(config.stream_key.is_empty());
        assert_eq!(config.bitrate_kbps, 4000);
        assert_eq!(config.resolution, Resolution::new(1920, 1080));
        assert_eq!(config.fps, 30);
        assert_eq!(config.video_codec, "libx264");
        assert_eq!(config.audio_bitrate_kbps, 128);
    }

    #[test]
    fn test_builder_chaining() {
        let config = StreamConfig::new(Platform::Custom)
            .stream_key("secret")
            .server_url("rtmp://ingest.example.com/live")
            .enabled(true)
            .bitrate_kbps(2500)
            .resolution(Resolution::new(1280, 720))
            .fps(60)
            .audio_bitrate_kbps(160);

        assert!(config.is_startable());
        assert_eq!(config.bitrate_kbps, 2500);
        assert_eq!(config.resolution.to_string(), "1280x720");
        assert_eq!(config.fps, 60);
        assert_eq!(config.audio_bitrate_kbps, 160);
    }

    #[test]
    fn test_not_startable_without_key() {
        let config = StreamConfig::new(Platform::Twitch).enabled(true);
        assert!(!config.is_startable());

        let config = config.stream_key("k");
        assert!(config.is_startable());
    }

    #[test]
    fn test_fps_floor() {
        let config = StreamConfig::new(Platform::Twitch).fps(0);
        assert_eq!(config.fps, 1);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = StreamConfig::new(Platform::Twitch).stream_key("super-secret");
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn test_resolution_parse() {
        let r: Resolution = "1280x720".parse().unwrap();
        assert_eq!(r, Resolution::new(1280, 720));

        let r: Resolution = "640X480".parse().unwrap();
        assert_eq!(r, Resolution::new(640, 480));

        assert!("1280".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_frame_bytes() {
        assert_eq!(Resolution::new(4, 2).frame_bytes(), 24);
    }
}
