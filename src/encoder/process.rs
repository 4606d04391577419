//! Encoder subprocess lifecycle
//!
//! One [`EncoderProcess`] per destination. Stdin is piped for raw frame
//! input; stdout/stderr are discarded so a chatty encoder cannot block.
//! Stop is graceful (close stdin, wait) with a force-kill after the
//! configured timeout.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};

use crate::config::Platform;
use crate::error::{Error, Result};

use super::command::EncoderCommand;

/// A running encoder subprocess
pub struct EncoderProcess {
    platform: Platform,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl EncoderProcess {
    /// Spawn the encoder
    pub fn spawn(platform: Platform, command: &EncoderCommand) -> Result<Self> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn { platform, source })?;

        let stdin = child.stdin.take();

        tracing::info!(
            platform = %platform,
            encoder = %command.program,
            pid = child.id(),
            "Encoder spawned"
        );

        Ok(Self {
            platform,
            child,
            stdin,
        })
    }

    /// Check whether the child is still alive without blocking
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Write one frame's raw payload to the encoder's stdin
    pub async fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        let platform = self.platform;
        let stdin = self.stdin.as_mut().ok_or(Error::NotRunning)?;

        stdin
            .write_all(payload)
            .await
            .map_err(|source| Error::PipeWrite { platform, source })?;

        Ok(())
    }

    /// Stop the encoder: close stdin, wait up to `timeout`, then kill
    ///
    /// Returns `Error::StopTimeout` when the kill path was taken; the child
    /// is reaped either way.
    pub async fn stop(&mut self, timeout: Duration) -> Result<()> {
        // Closing stdin signals EOF; a healthy encoder flushes and exits
        drop(self.stdin.take());

        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(
                    platform = %self.platform,
                    status = %status,
                    "Encoder exited"
                );
                Ok(())
            }
            Ok(Err(source)) => Err(Error::Spawn {
                platform: self.platform,
                source,
            }),
            Err(_) => {
                tracing::warn!(platform = %self.platform, "Encoder stop timeout, killing");
                let _ = self.child.start_kill();
                let _ = self.child.wait().await;
                Err(Error::StopTimeout(self.platform))
            }
        }
    }
}

impl std::fmt::Debug for EncoderProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderProcess")
            .field("platform", &self.platform)
            .field("pid", &self.child.id())
            .finish()
    }
}
