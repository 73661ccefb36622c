//! Timestamps for notes synthesized on this device.

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock that never goes backwards within one session.
#[derive(Debug, Clone, Default)]
pub struct LocalClock {
    last_issued_ms: i64,
}

impl LocalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the floor to a timestamp already present in the list.
    pub fn observe(&mut self, timestamp_ms: i64) {
        self.last_issued_ms = self.last_issued_ms.max(timestamp_ms);
    }

    /// Returns current epoch milliseconds, clamped to the last issued value.
    pub fn next_timestamp(&mut self) -> i64 {
        let next = now_epoch_ms().max(self.last_issued_ms);
        self.last_issued_ms = next;
        next
    }
}

fn now_epoch_ms() -> i64 {
    // A clock set before 1970 degrades to 0 and the clamp keeps order.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
