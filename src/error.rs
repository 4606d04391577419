//! Crate-wide error types
//!
//! Every fallible operation returns a typed error instead of logging and
//! swallowing. Pipe write failures are recoverable (they feed the outlet's
//! reconnect policy); spawn failures after retries are fatal for the outlet.

use crate::config::Platform;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for restream operations
#[derive(Debug)]
pub enum Error {
    /// Invalid or incomplete configuration
    Config(ConfigError),
    /// Encoder subprocess could not be spawned
    Spawn {
        /// Destination platform
        platform: Platform,
        /// Underlying OS error
        source: std::io::Error,
    },
    /// Writing a frame to the encoder's input pipe failed
    PipeWrite {
        /// Destination platform
        platform: Platform,
        /// Underlying OS error
        source: std::io::Error,
    },
    /// Encoder did not terminate within the stop timeout and was killed
    StopTimeout(Platform),
    /// Reconnect attempts exhausted; outlet is permanently stopped
    ReconnectExhausted {
        /// Destination platform
        platform: Platform,
        /// Number of attempts made
        attempts: u32,
    },
    /// Operation requires a running outlet/relay
    NotRunning,
    /// No enabled destination had a stream key; nothing to start
    NoOutlets,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stream key is empty for an enabled destination
    MissingStreamKey(Platform),
    /// Custom platform requires a server URL
    MissingServerUrl,
    /// Server URL is not an rtmp:// or rtmps:// URL
    InvalidServerUrl(String),
    /// Resolution string could not be parsed as WIDTHxHEIGHT
    InvalidResolution(String),
    /// Frame payload length does not match width * height * 3
    InvalidFrameSize {
        /// Expected payload length in bytes
        expected: usize,
        /// Actual payload length in bytes
        actual: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {}", e),
            Error::Spawn { platform, source } => {
                write!(f, "failed to spawn encoder for {}: {}", platform, source)
            }
            Error::PipeWrite { platform, source } => {
                write!(f, "encoder pipe write failed for {}: {}", platform, source)
            }
            Error::StopTimeout(platform) => {
                write!(f, "encoder for {} did not stop in time, killed", platform)
            }
            Error::ReconnectExhausted { platform, attempts } => write!(
                f,
                "stream to {} stopped after {} failed reconnect attempts",
                platform, attempts
            ),
            Error::NotRunning => write!(f, "not running"),
            Error::NoOutlets => write!(f, "no enabled destination with a stream key"),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingStreamKey(platform) => {
                write!(f, "stream key missing for {}", platform)
            }
            ConfigError::MissingServerUrl => write!(f, "custom platform requires a server URL"),
            ConfigError::InvalidServerUrl(url) => write!(f, "invalid server URL: {}", url),
            ConfigError::InvalidResolution(s) => write!(f, "invalid resolution: {}", s),
            ConfigError::InvalidFrameSize { expected, actual } => write!(
                f,
                "frame payload is {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn { source, .. } | Error::PipeWrite { source, .. } => Some(source),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_no_key_material() {
        // Error messages must never carry the stream key itself
        let err = Error::Config(ConfigError::MissingStreamKey(Platform::Twitch));
        let msg = err.to_string();
        assert!(msg.contains("twitch"));
        assert!(!msg.contains("key=")); // key value never formatted
    }

    #[test]
    fn test_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let err = Error::PipeWrite {
            platform: Platform::YouTube,
            source: io,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
