//! Statistics records
//!
//! Read-only snapshots; all derived values guard against zero durations.

use std::time::Duration;

use crate::config::Platform;

/// Snapshot of one outlet's counters
#[derive(Debug, Clone)]
pub struct OutletStats {
    /// Destination platform
    pub platform: Platform,
    /// Whether the outlet is currently running
    pub is_running: bool,
    /// Time since the outlet started
    pub uptime: Duration,
    /// Frames written to the encoder pipe
    pub frames_sent: u64,
    /// Reconnect attempts consumed so far
    pub reconnect_attempts: u32,
}

impl OutletStats {
    /// Achieved frame rate since start
    pub fn fps(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.frames_sent as f64 / secs
        } else {
            0.0
        }
    }
}

/// Relay-wide snapshot
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Per-outlet snapshots for every live outlet
    pub outlets: Vec<OutletStats>,
    /// Frames dropped at the queue since the last start
    pub frames_dropped: u64,
    /// Frames accepted into the queue since the last start
    pub frames_enqueued: u64,
}

impl RelayStats {
    /// Number of outlets currently running
    pub fn active_outlets(&self) -> usize {
        self.outlets.iter().filter(|o| o.is_running).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_zero_uptime() {
        let stats = OutletStats {
            platform: Platform::Twitch,
            is_running: true,
            uptime: Duration::ZERO,
            frames_sent: 100,
            reconnect_attempts: 0,
        };

        // Must not divide by zero
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_fps() {
        let stats = OutletStats {
            platform: Platform::Twitch,
            is_running: true,
            uptime: Duration::from_secs(10),
            frames_sent: 300,
            reconnect_attempts: 1,
        };

        assert_eq!(stats.fps(), 30.0);
    }

    #[test]
    fn test_active_outlets() {
        let running = OutletStats {
            platform: Platform::Twitch,
            is_running: true,
            uptime: Duration::from_secs(1),
            frames_sent: 1,
            reconnect_attempts: 0,
        };
        let stopped = OutletStats {
            platform: Platform::YouTube,
            is_running: false,
            ..running.clone()
        };

        let stats = RelayStats {
            outlets: vec![running, stopped],
            frames_dropped: 0,
            frames_enqueued: 2,
        };
        assert_eq!(stats.active_outlets(), 1);
    }
}
