//! SNTP-backed wall clock

use medibox_core::time::ClockReading;
use medibox_core::traits::ClockSource;

use crate::channels::TIME_SYNC;

/// Wall clock over the shared SNTP sync point
///
/// Readings derive from the last synchronization plus the monotonic
/// time elapsed since, with the user offset applied. Before the first
/// sync lands this reports the epoch; the main task does not start the
/// control loop until a sync exists.
pub struct NtpClock {
    offset_seconds: i32,
}

impl NtpClock {
    pub const fn new() -> Self {
        Self { offset_seconds: 0 }
    }
}

impl Default for NtpClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for NtpClock {
    fn now(&mut self) -> ClockReading {
        let utc = match TIME_SYNC.lock(|cell| cell.get()) {
            Some(point) => point.unix_secs as i64 + point.at.elapsed().as_secs() as i64,
            None => 0,
        };
        ClockReading::from_epoch(utc + self.offset_seconds as i64)
    }

    fn set_offset_seconds(&mut self, seconds: i32) {
        self.offset_seconds = seconds;
    }
}
