//! Stream outlet implementation
//!
//! One outlet per destination. The outlet owns the encoder subprocess,
//! rescales incoming frames to its configured geometry, and applies the
//! bounded reconnect policy: each failed write (or dead child) consumes one
//! reconnect attempt; exhausting the attempts stops the outlet permanently
//! until the caller starts it again.

use std::time::Instant;

use crate::config::{Platform, RelayConfig, StreamConfig};
use crate::encoder::{EncoderCommand, EncoderProcess};
use crate::error::{ConfigError, Error, Result};
use crate::frame::{scale_nearest, RawFrame};
use crate::stats::OutletStats;

use super::state::OutletState;

/// A single streaming destination backed by one encoder subprocess
pub struct StreamOutlet {
    config: StreamConfig,
    relay: RelayConfig,
    state: OutletState,
    process: Option<EncoderProcess>,
    started_at: Option<Instant>,
    frames_sent: u64,
    reconnect_attempts: u32,
}

impl StreamOutlet {
    /// Create an idle outlet
    pub fn new(config: StreamConfig, relay: RelayConfig) -> Self {
        Self {
            config,
            relay,
            state: OutletState::Idle,
            process: None,
            started_at: None,
            frames_sent: 0,
            reconnect_attempts: 0,
        }
    }

    /// Destination platform
    pub fn platform(&self) -> Platform {
        self.config.platform
    }

    /// Current lifecycle state
    pub fn state(&self) -> OutletState {
        self.state
    }

    /// Start the outlet: resolve the ingest URL and spawn the encoder
    ///
    /// A running outlet is left untouched (one subprocess per destination).
    /// An explicit start resets the reconnect budget and counters.
    pub fn start(&mut self) -> Result<()> {
        if !self.state.can_start() {
            return Ok(());
        }

        // Catch a degenerate geometry here instead of handing the encoder
        // `-s 0x0` and burning the reconnect budget on it
        let resolution = self.config.resolution;
        if resolution.width == 0 || resolution.height == 0 {
            return Err(Error::Config(ConfigError::InvalidResolution(
                resolution.to_string(),
            )));
        }

        let url = self.config.ingest_url()?;
        let command = EncoderCommand::build(&self.relay, &self.config, &url);
        let process = EncoderProcess::spawn(self.config.platform, &command)?;

        self.process = Some(process);
        self.state = OutletState::Running;
        self.started_at = Some(Instant::now());
        self.frames_sent = 0;
        self.reconnect_attempts = 0;

        tracing::info!(
            platform = %self.config.platform,
            resolution = %self.config.resolution,
            fps = self.config.fps,
            bitrate_kbps = self.config.bitrate_kbps,
            "Outlet started"
        );

        Ok(())
    }

    /// Feed one frame to the encoder
    ///
    /// No-op when idle or stopped. A dead child or a failed pipe write
    /// consumes one reconnect attempt; the triggering frame is dropped
    /// either way (real-time delivery over completeness).
    pub async fn send_frame(&mut self, frame: &RawFrame) -> Result<()> {
        if !self.state.accepts_frames() {
            return match self.state {
                OutletState::Reconnecting => self.attempt_reconnect().await,
                _ => Ok(()),
            };
        }

        let alive = self.process.as_mut().is_some_and(|p| p.is_running());
        if !alive {
            tracing::warn!(platform = %self.config.platform, "Encoder exited unexpectedly");
            return self.attempt_reconnect().await;
        }

        let scaled;
        let payload = if frame.matches(self.config.resolution) {
            &frame.data
        } else {
            scaled = scale_nearest(frame, self.config.resolution);
            &scaled.data
        };

        let process = self.process.as_mut().ok_or(Error::NotRunning)?;
        match process.write_frame(payload).await {
            Ok(()) => {
                self.frames_sent += 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    platform = %self.config.platform,
                    error = %e,
                    "Frame write failed"
                );
                self.attempt_reconnect().await
            }
        }
    }

    /// Consume one reconnect attempt: stop the child, wait, respawn
    ///
    /// Past the attempt budget, the outlet stops permanently and reports
    /// `ReconnectExhausted`; only a caller `start()` revives it.
    async fn attempt_reconnect(&mut self) -> Result<()> {
        if self.reconnect_attempts >= self.relay.max_reconnect_attempts {
            self.shutdown_process().await;
            self.state = OutletState::Stopped;

            tracing::error!(
                platform = %self.config.platform,
                attempts = self.reconnect_attempts,
                "Reconnect attempts exhausted, outlet stopped"
            );

            return Err(Error::ReconnectExhausted {
                platform: self.config.platform,
                attempts: self.reconnect_attempts,
            });
        }

        self.reconnect_attempts += 1;
        self.state = OutletState::Reconnecting;

        tracing::info!(
            platform = %self.config.platform,
            attempt = self.reconnect_attempts,
            max = self.relay.max_reconnect_attempts,
            "Reconnecting"
        );

        self.shutdown_process().await;
        tokio::time::sleep(self.relay.reconnect_delay).await;

        let url = self.config.ingest_url()?;
        let command = EncoderCommand::build(&self.relay, &self.config, &url);
        match EncoderProcess::spawn(self.config.platform, &command) {
            Ok(process) => {
                self.process = Some(process);
                self.state = OutletState::Running;
                tracing::info!(platform = %self.config.platform, "Reconnected");
                Ok(())
            }
            Err(e) => {
                // Stay in Reconnecting; the next frame consumes the next attempt
                tracing::warn!(
                    platform = %self.config.platform,
                    error = %e,
                    "Respawn failed"
                );
                Err(e)
            }
        }
    }

    /// Stop the outlet; idempotent
    pub async fn stop(&mut self) {
        self.shutdown_process().await;

        if self.state != OutletState::Stopped {
            self.state = OutletState::Stopped;
            tracing::info!(
                platform = %self.config.platform,
                frames_sent = self.frames_sent,
                "Outlet stopped"
            );
        }
    }

    async fn shutdown_process(&mut self) {
        if let Some(mut process) = self.process.take() {
            // A kill after the stop timeout is already logged by the process
            let _ = process.stop(self.relay.stop_timeout).await;
        }
    }

    /// Snapshot of this outlet's counters
    pub fn stats(&self) -> OutletStats {
        OutletStats {
            platform: self.config.platform,
            is_running: self.state == OutletState::Running,
            uptime: self.started_at.map(|t| t.elapsed()).unwrap_or_default(),
            frames_sent: self.frames_sent,
            reconnect_attempts: self.reconnect_attempts,
        }
    }
}
