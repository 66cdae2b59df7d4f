use std::sync::{Arc, PoisonError, RwLock};

use wattch_protocol::TelemetrySnapshot;

/// Shared home of the latest telemetry, handed to each producer and the
/// renderer at startup.
///
/// Writes run a closure under the exclusive lock, so every field touched by
/// one write becomes visible to readers at the same time. Reads copy the
/// whole snapshot out under the shared lock.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<TelemetrySnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write<R>(&self, update: impl FnOnce(&mut TelemetrySnapshot) -> R) -> R {
        // A panic mid-write cannot leave a torn value behind: every field is
        // plain data and setters are single assignments.
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut guard)
    }

    pub fn read(&self) -> TelemetrySnapshot {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
