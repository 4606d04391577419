//! Raw frame type

use bytes::Bytes;

use crate::config::Resolution;
use crate::error::ConfigError;

/// One raw BGR video frame
///
/// Cheap to clone: the pixel payload is reference-counted, so every outlet
/// in a fan-out shares the same allocation.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Packed BGR pixel data, `width * height * 3` bytes
    pub data: Bytes,
}

impl RawFrame {
    /// Create a frame, validating the dimensions and payload length
    pub fn new(width: u32, height: u32, data: Bytes) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution(format!(
                "{}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ConfigError::InvalidFrameSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a black frame at the given resolution
    pub fn black(resolution: Resolution) -> Self {
        Self {
            width: resolution.width,
            height: resolution.height,
            data: Bytes::from(vec![0u8; resolution.frame_bytes()]),
        }
    }

    /// Frame resolution
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Whether this frame already matches `resolution`
    pub fn matches(&self, resolution: Resolution) -> bool {
        self.width == resolution.width && self.height == resolution.height
    }
}
