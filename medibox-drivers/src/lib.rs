//! Peripheral drivers for the MediBox appliance
//!
//! Hardware-facing implementations of the `medibox-core` traits that
//! are still portable across boards: each driver talks to its device
//! through a narrow platform abstraction (a pin, a delay) supplied by
//! the firmware.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod sensor;
