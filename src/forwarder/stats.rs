use std::sync::atomic::{AtomicU64, Ordering};

/// Failure and throughput counters, updated from any forwarding thread.
#[derive(Debug, Default)]
pub struct ForwarderStats {
    records_sent: AtomicU64,
    descriptor_updates: AtomicU64,
    transport_failures: AtomicU64,
    not_ready_drops: AtomicU64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub records_sent: u64,
    pub descriptor_updates: u64,
    pub transport_failures: u64,
    pub not_ready_drops: u64,
}

impl ForwarderStats {
    pub fn record_sent(&self) {
        self.records_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn descriptor_update(&self) {
        self.descriptor_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn not_ready_drop(&self) {
        self.not_ready_drops.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            records_sent: self.records_sent.load(Ordering::Relaxed),
            descriptor_updates: self.descriptor_updates.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            not_ready_drops: self.not_ready_drops.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records sent, {} descriptor updates, {} transport failures, {} dropped while not ready",
            self.records_sent,
            self.descriptor_updates,
            self.transport_failures,
            self.not_ready_drops
        )
    }
}
