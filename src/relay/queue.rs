//! Bounded frame queue
//!
//! A thin wrapper over a bounded mpsc channel with a non-blocking producer
//! side. A full queue drops the incoming frame and counts it; the producer
//! is never blocked and the queue never grows past its capacity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::frame::RawFrame;

/// Shared drop/accept counters for a queue
#[derive(Debug, Default)]
pub struct QueueCounters {
    /// Frames accepted into the queue
    pub enqueued: AtomicU64,
    /// Frames dropped because the queue was full
    pub dropped: AtomicU64,
}

/// Producer half of the frame queue
#[derive(Clone)]
pub struct FrameQueue {
    tx: mpsc::Sender<RawFrame>,
    counters: Arc<QueueCounters>,
}

impl FrameQueue {
    /// Create a queue; returns the producer handle and the consumer receiver
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<RawFrame>) {
        Self::with_counters(capacity, Arc::new(QueueCounters::default()))
    }

    /// Create a queue that records into caller-owned counters
    ///
    /// Lets the counters outlive the queue, so drop totals survive a
    /// stop/start cycle. The counters are reset here.
    pub fn with_counters(
        capacity: usize,
        counters: Arc<QueueCounters>,
    ) -> (Self, mpsc::Receiver<RawFrame>) {
        counters.enqueued.store(0, Ordering::Relaxed);
        counters.dropped.store(0, Ordering::Relaxed);

        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, counters }, rx)
    }

    /// Enqueue a frame without blocking
    ///
    /// Returns `true` if the frame was accepted, `false` if it was dropped
    /// (queue full or consumer gone).
    pub fn push(&self, frame: RawFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => {
                self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Frames accepted so far
    pub fn enqueued(&self) -> u64 {
        self.counters.enqueued.load(Ordering::Relaxed)
    }

    /// Frames dropped so far
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }
}
