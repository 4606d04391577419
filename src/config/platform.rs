//! Streaming platforms and ingest URL resolution
//!
//! Each named platform has a fixed RTMP ingest template; `Custom` publishes
//! to a caller-supplied server URL. The resolved URL embeds the stream key,
//! so it is treated as a secret and never logged.

use crate::error::ConfigError;

/// Twitch primary ingest
const TWITCH_INGEST: &str = "rtmp://live.twitch.tv/app";
/// YouTube primary ingest
const YOUTUBE_INGEST: &str = "rtmp://a.rtmp.youtube.com/live2";
/// Facebook Live ingest (RTMPS only)
const FACEBOOK_INGEST: &str = "rtmps://live-api-s.facebook.com:443/rtmp";

/// A supported streaming destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Twitch
    Twitch,
    /// YouTube Live
    YouTube,
    /// Facebook Live
    Facebook,
    /// Any other RTMP ingest, identified by a caller-supplied server URL
    Custom,
}

impl Platform {
    /// All platforms, in the order the relay seeds its default configs
    pub const ALL: [Platform; 4] = [
        Platform::Twitch,
        Platform::YouTube,
        Platform::Facebook,
        Platform::Custom,
    ];

    /// Resolve the full publish URL for this platform
    ///
    /// `server_url` is only consulted for `Custom`. Returns an error for an
    /// empty key, a missing custom URL, or a custom URL that is not
    /// rtmp(s)://.
    pub fn ingest_url(&self, stream_key: &str, server_url: &str) -> Result<String, ConfigError> {
        if stream_key.is_empty() {
            return Err(ConfigError::MissingStreamKey(*self));
        }

        let base = match self {
            Platform::Twitch => TWITCH_INGEST,
            Platform::YouTube => YOUTUBE_INGEST,
            Platform::Facebook => FACEBOOK_INGEST,
            Platform::Custom => {
                if server_url.is_empty() {
                    return Err(ConfigError::MissingServerUrl);
                }
                if !server_url.starts_with("rtmp://") && !server_url.starts_with("rtmps://") {
                    return Err(ConfigError::InvalidServerUrl(server_url.to_string()));
                }
                server_url.trim_end_matches('/')
            }
        };

        Ok(format!("{}/{}", base, stream_key))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Twitch => "twitch",
            Platform::YouTube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}
