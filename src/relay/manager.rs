//! Relay manager
//!
//! Owns the per-platform configs, the live outlet map, the bounded frame
//! queue, and the single dispatch task. Reconfiguration while live is
//! supported: the outlet map sits behind an async `RwLock`, enabling a
//! platform mid-stream spawns its outlet immediately, and disabling stops
//! and removes it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;

use crate::config::{Platform, RelayConfig, StreamConfig};
use crate::error::{Error, Result};
use crate::frame::RawFrame;
use crate::outlet::{OutletState, StreamOutlet};
use crate::stats::RelayStats;

use super::queue::{FrameQueue, QueueCounters};

type OutletMap = HashMap<Platform, Arc<tokio::sync::Mutex<StreamOutlet>>>;

/// Fan-out relay over multiple streaming destinations
pub struct RelayManager {
    relay_config: RelayConfig,

    /// Destination configs, one per platform, disabled until given a key
    configs: Mutex<HashMap<Platform, StreamConfig>>,

    /// Live outlets, present only between start and stop (or live enable/disable)
    outlets: Arc<RwLock<OutletMap>>,

    /// Producer half of the frame queue, present while streaming
    queue: Mutex<Option<FrameQueue>>,

    /// Queue counters, owned here so totals survive the queue itself
    counters: Arc<QueueCounters>,

    /// Shutdown signal for the dispatch task
    shutdown: Mutex<Option<watch::Sender<bool>>>,

    /// Dispatch task handle
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl RelayManager {
    /// Create a relay with every platform present but disabled
    pub fn new(relay_config: RelayConfig) -> Self {
        let configs = Platform::ALL
            .iter()
            .map(|&p| (p, StreamConfig::new(p)))
            .collect();

        Self {
            relay_config,
            configs: Mutex::new(configs),
            outlets: Arc::new(RwLock::new(HashMap::new())),
            queue: Mutex::new(None),
            counters: Arc::new(QueueCounters::default()),
            shutdown: Mutex::new(None),
            dispatch: Mutex::new(None),
        }
    }

    /// Replace one destination's configuration
    ///
    /// While streaming, the change takes effect immediately: a startable
    /// config (re)spawns its outlet, a disabled one stops and removes it.
    pub async fn set_config(&self, config: StreamConfig) -> Result<()> {
        let platform = config.platform;
        let startable = config.is_startable();

        if let Ok(mut configs) = self.configs.lock() {
            configs.insert(platform, config.clone());
        }

        if !self.is_streaming() {
            return Ok(());
        }

        // Live diff: drop any existing outlet for this platform first.
        // The map guard must not be held across the stop, which can block
        // up to the stop timeout and would stall the dispatch snapshot.
        let removed = self.outlets.write().await.remove(&platform);
        if let Some(outlet) = removed {
            outlet.lock().await.stop().await;
        }

        if startable {
            self.spawn_outlet(config).await?;
        }

        Ok(())
    }

    /// Enable a destination, keeping its stored key and encoding settings
    pub async fn enable(&self, platform: Platform) -> Result<()> {
        let config = self.stored_config(platform).enabled(true);
        self.set_config(config).await
    }

    /// Disable a destination; stops its outlet when live
    pub async fn disable(&self, platform: Platform) -> Result<()> {
        let config = self.stored_config(platform).enabled(false);
        self.set_config(config).await
    }

    fn stored_config(&self, platform: Platform) -> StreamConfig {
        self.configs
            .lock()
            .ok()
            .and_then(|c| c.get(&platform).cloned())
            .unwrap_or_else(|| StreamConfig::new(platform))
    }

    /// Start streaming to every enabled destination with a stream key
    ///
    /// Spawns the dispatch task when at least one outlet starts and returns
    /// the number of started outlets. Fails with `NoOutlets` when none
    /// start; a no-op when already streaming.
    pub async fn start(&self) -> Result<usize> {
        if self.is_streaming() {
            return Ok(self.active_outlet_count().await);
        }

        let startable: Vec<StreamConfig> = self
            .configs
            .lock()
            .map(|c| c.values().filter(|c| c.is_startable()).cloned().collect())
            .unwrap_or_default();

        let mut started = 0usize;
        for config in startable {
            match self.spawn_outlet(config).await {
                Ok(()) => started += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Outlet failed to start");
                }
            }
        }

        if started == 0 {
            return Err(Error::NoOutlets);
        }

        let (queue, rx) =
            FrameQueue::with_counters(self.relay_config.queue_capacity, Arc::clone(&self.counters));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(dispatch_loop(Arc::clone(&self.outlets), rx, shutdown_rx));

        if let Ok(mut q) = self.queue.lock() {
            *q = Some(queue);
        }
        if let Ok(mut s) = self.shutdown.lock() {
            *s = Some(shutdown_tx);
        }
        if let Ok(mut d) = self.dispatch.lock() {
            *d = Some(handle);
        }

        tracing::info!(outlets = started, "Relay started");
        Ok(started)
    }

    async fn spawn_outlet(&self, config: StreamConfig) -> Result<()> {
        let platform = config.platform;
        let mut outlet = StreamOutlet::new(config, self.relay_config.clone());
        outlet.start()?;

        self.outlets
            .write()
            .await
            .insert(platform, Arc::new(tokio::sync::Mutex::new(outlet)));
        Ok(())
    }

    /// Enqueue a frame for fan-out
    ///
    /// Non-blocking and callable from any thread. Returns `false` when the
    /// frame was dropped (queue full) or the relay is not streaming.
    pub fn send_frame(&self, frame: RawFrame) -> bool {
        let queue = match self.queue.lock() {
            Ok(q) => q.clone(),
            Err(_) => None,
        };

        match queue {
            Some(q) => q.push(frame),
            None => false,
        }
    }

    /// Stop streaming: signal the dispatch task, join it, stop every outlet
    ///
    /// Idempotent; a no-op when not streaming.
    pub async fn stop(&self) {
        let shutdown = self.shutdown.lock().ok().and_then(|mut s| s.take());
        let Some(shutdown) = shutdown else {
            return;
        };

        let _ = shutdown.send(true);

        // Dropping the producer closes the channel as a second wake-up path
        if let Ok(mut q) = self.queue.lock() {
            q.take();
        }

        let handle = self.dispatch.lock().ok().and_then(|mut d| d.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        let drained: Vec<_> = self.outlets.write().await.drain().collect();
        for (_, outlet) in drained {
            outlet.lock().await.stop().await;
        }

        tracing::info!(
            frames_enqueued = self.counters.enqueued.load(std::sync::atomic::Ordering::Relaxed),
            frames_dropped = self.counters.dropped.load(std::sync::atomic::Ordering::Relaxed),
            "Relay stopped"
        );
    }

    /// Whether the dispatch task is live
    pub fn is_streaming(&self) -> bool {
        self.shutdown.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Number of outlets currently in the `Running` state
    pub async fn active_outlet_count(&self) -> usize {
        let outlets = self.outlets.read().await;
        let mut count = 0;
        for outlet in outlets.values() {
            if outlet.lock().await.state() == OutletState::Running {
                count += 1;
            }
        }
        count
    }

    /// Relay-wide statistics snapshot
    pub async fn stats(&self) -> RelayStats {
        let outlets = self.outlets.read().await;
        let mut snapshots = Vec::with_capacity(outlets.len());
        for outlet in outlets.values() {
            snapshots.push(outlet.lock().await.stats());
        }

        RelayStats {
            outlets: snapshots,
            frames_dropped: self.counters.dropped.load(std::sync::atomic::Ordering::Relaxed),
            frames_enqueued: self.counters.enqueued.load(std::sync::atomic::Ordering::Relaxed),
        }
    }
}

/// Dispatch task: drain the queue and fan each frame out sequentially
///
/// Outlets that exhaust their reconnect budget are removed from the live
/// set here; other errors are already logged by the outlet.
async fn dispatch_loop(
    outlets: Arc<RwLock<OutletMap>>,
    mut rx: mpsc::Receiver<RawFrame>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!("Dispatch task started");

    loop {
        let frame = tokio::select! {
            _ = shutdown.changed() => break,
            maybe = rx.recv() => match maybe {
                Some(frame) => frame,
                None => break,
            },
        };

        // Snapshot the live set; fan-out must not hold the map lock while
        // awaiting pipe writes
        let live: Vec<(Platform, Arc<tokio::sync::Mutex<StreamOutlet>>)> = {
            let map = outlets.read().await;
            map.iter().map(|(p, o)| (*p, Arc::clone(o))).collect()
        };

        for (platform, outlet) in live {
            let result = outlet.lock().await.send_frame(&frame).await;
            if let Err(Error::ReconnectExhausted { .. }) = result {
                outlets.write().await.remove(&platform);
                tracing::error!(platform = %platform, "Outlet removed after exhausted reconnects");
            }
        }
    }

    tracing::debug!("Dispatch task exited");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::Resolution;
    use crate::testutil::{failing_encoder, sink_encoder};

    use super::*;

    fn test_relay_config(encoder: String) -> RelayConfig {
        RelayConfig::default()
            .encoder_binary(encoder)
            .reconnect_delay(Duration::from_millis(10))
            .stop_timeout(Duration::from_millis(500))
    }

    fn small_config(platform: Platform) -> StreamConfig {
        StreamConfig::new(platform)
            .stream_key("test-key")
            .enabled(true)
            .resolution(Resolution::new(4, 4))
    }

    fn frame() -> RawFrame {
        RawFrame::black(Resolution::new(4, 4))
    }

    #[tokio::test]
    async fn test_start_single_platform() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();

        let started = manager.start().await.unwrap();
        assert_eq!(started, 1);
        assert!(manager.is_streaming());
        assert_eq!(manager.active_outlet_count().await, 1);

        manager.stop().await;
        assert!(!manager.is_streaming());
    }

    #[tokio::test]
    async fn test_start_all_disabled() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));

        let result = manager.start().await;
        assert!(matches!(result, Err(Error::NoOutlets)));

        // No dispatch task was created
        assert!(!manager.is_streaming());
        assert_eq!(manager.active_outlet_count().await, 0);
    }

    #[tokio::test]
    async fn test_enabled_without_key_not_started() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager
            .set_config(StreamConfig::new(Platform::Twitch).enabled(true))
            .await
            .unwrap();

        assert!(matches!(manager.start().await, Err(Error::NoOutlets)));
    }

    #[tokio::test]
    async fn test_frames_flow_to_outlet() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        for _ in 0..5 {
            assert!(manager.send_frame(frame()));
        }

        // Let the dispatch task drain the queue
        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = manager.stats().await;
        assert_eq!(stats.frames_enqueued, 5);
        assert_eq!(stats.outlets.len(), 1);
        assert_eq!(stats.outlets[0].frames_sent, 5);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_send_frame_when_not_streaming() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        assert!(!manager.send_frame(frame()));
    }

    #[tokio::test]
    async fn test_stop_idempotent() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));

        // Not streaming: both calls are no-ops
        manager.stop().await;
        manager.stop().await;

        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        manager.stop().await;
        manager.stop().await;
        assert!(!manager.is_streaming());
    }

    #[tokio::test]
    async fn test_start_twice_is_noop() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();

        manager.start().await.unwrap();
        let again = manager.start().await.unwrap();
        assert_eq!(again, 1);
        assert_eq!(manager.active_outlet_count().await, 1);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_live_enable_and_disable() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();
        assert_eq!(manager.active_outlet_count().await, 1);

        // Bring a second platform up mid-stream
        manager.set_config(small_config(Platform::YouTube)).await.unwrap();
        assert_eq!(manager.active_outlet_count().await, 2);

        // And take it back down
        manager.disable(Platform::YouTube).await.unwrap();
        assert_eq!(manager.active_outlet_count().await, 1);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_exhausted_outlet_removed_from_live_set() {
        let manager = RelayManager::new(test_relay_config(failing_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        // Keep frames flowing until the outlet burns through its budget
        let mut removed = false;
        for _ in 0..150 {
            manager.send_frame(frame());
            tokio::time::sleep(Duration::from_millis(20)).await;

            if manager.stats().await.outlets.is_empty() {
                removed = true;
                break;
            }
        }

        assert!(removed);
        assert_eq!(manager.active_outlet_count().await, 0);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_degenerate_frame_does_not_kill_dispatch() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        // A zero-dimension frame is constructible via the public fields;
        // fan-out must survive rescaling it
        let degenerate = RawFrame {
            width: 0,
            height: 0,
            data: bytes::Bytes::new(),
        };
        assert!(manager.send_frame(degenerate));

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Dispatch is still alive and delivering
        for _ in 0..3 {
            assert!(manager.send_frame(frame()));
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = manager.stats().await;
        assert!(manager.is_streaming());
        assert_eq!(stats.outlets.len(), 1);
        assert_eq!(stats.outlets[0].frames_sent, 4);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_set_config_keeps_frames_flowing() {
        let manager = RelayManager::new(test_relay_config(sink_encoder()));
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        // Reconfigure another platform mid-stream while frames keep coming
        manager.set_config(small_config(Platform::YouTube)).await.unwrap();
        for _ in 0..5 {
            assert!(manager.send_frame(frame()));
        }
        manager.disable(Platform::YouTube).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = manager.stats().await;
        assert_eq!(stats.frames_enqueued, 5);
        let twitch = stats
            .outlets
            .iter()
            .find(|o| o.platform == Platform::Twitch)
            .unwrap();
        assert!(twitch.frames_sent > 0);

        manager.stop().await;
    }

    #[tokio::test]
    async fn test_queue_drop_counted() {
        let relay = test_relay_config(sink_encoder()).queue_capacity(2);
        let manager = RelayManager::new(relay);
        manager.set_config(small_config(Platform::Twitch)).await.unwrap();
        manager.start().await.unwrap();

        // Flood faster than the dispatch task can possibly drain
        for _ in 0..50 {
            manager.send_frame(frame());
        }

        let stats = manager.stats().await;
        assert!(stats.frames_dropped > 0);
        assert!(stats.frames_enqueued + stats.frames_dropped == 50);

        manager.stop().await;
    }
}
