//! Board bindings
//!
//! Implementations of the `medibox-core` hardware traits for this
//! board's peripherals.

pub mod alert;
pub mod buttons;
pub mod clock;
pub mod delay;
pub mod dht;
pub mod oled;

pub use alert::BuzzerLed;
pub use buttons::ButtonPad;
pub use clock::NtpClock;
pub use delay::TimerDelay;
pub use dht::{DhtLine, MicroDelay};
pub use oled::Oled;
