//! DHT22 data line and protocol timing

use embassy_rp::gpio::{Flex, Pull};
use embassy_time::{block_for, Duration};

use medibox_drivers::sensor::dht22::{DelayUs, DhtPin};

/// Open-drain style data line on a flexible GPIO
///
/// The line idles as a pulled-up input; driving low switches the pad to
/// output just long enough for the start signal.
pub struct DhtLine<'d> {
    pin: Flex<'d>,
}

impl<'d> DhtLine<'d> {
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        Self { pin }
    }
}

impl DhtPin for DhtLine<'_> {
    fn set_low(&mut self) {
        self.pin.set_low();
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}

/// Microsecond pacing for the one-wire protocol
pub struct MicroDelay;

impl DelayUs for MicroDelay {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
