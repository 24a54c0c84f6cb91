//! Cross-core shared state
//!
//! The network core publishes clock synchronization points here; the UI
//! core reads them when deriving wall-clock time.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

/// One successful SNTP synchronization
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncPoint {
    /// Seconds since the Unix epoch at the moment of `at`
    pub unix_secs: u64,
    /// Monotonic instant the timestamp was obtained
    pub at: Instant,
}

/// Latest sync point, written by the network core, read by the UI core
pub static TIME_SYNC: Mutex<CriticalSectionRawMutex, Cell<Option<SyncPoint>>> =
    Mutex::new(Cell::new(None));
