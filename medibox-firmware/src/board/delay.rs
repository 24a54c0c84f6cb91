//! Millisecond pacing for the control loop

use embassy_time::{block_for, Duration};

use medibox_core::traits::Delay;

/// Blocking delay over the shared timebase
pub struct TimerDelay;

impl Delay for TimerDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
