//! Receive-loop counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct ReceiveStats {
    frames_received: AtomicU64,
    frames_delivered: AtomicU64,
    device_events: AtomicU64,
    messages_skipped: AtomicU64,
}

impl ReceiveStats {
    pub(crate) fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn frame_delivered(&self) {
        self.frames_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn device_event(&self) {
        self.device_events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn message_skipped(&self) {
        self.messages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            device_events: self.device_events.load(Ordering::Relaxed),
            messages_skipped: self.messages_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a client's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Frames decoded successfully
    pub frames_received: u64,
    /// Frames handed to a frame handler
    pub frames_delivered: u64,
    pub device_events: u64,
    /// Messages dropped because they could not be decoded or received
    pub messages_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = ReceiveStats::default();
        stats.frame_received();
        stats.frame_received();
        stats.frame_delivered();
        stats.message_skipped();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.frames_received, 2);
        assert_eq!(snapshot.frames_delivered, 1);
        assert_eq!(snapshot.device_events, 0);
        assert_eq!(snapshot.messages_skipped, 1);
    }
}
