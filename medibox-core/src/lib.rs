//! Board-agnostic core logic for the MediBox medication reminder
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (clock, buttons, display, alert, sensor)
//! - Wall-clock data model (calendar breakdown, UTC offset)
//! - Alarm table with once-per-match firing semantics
//! - Configuration menu with bounded/wrapping edit fields
//! - Environmental warning evaluation
//! - The top-level sequential control loop

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod alarm;
pub mod app;
pub mod edit;
pub mod env;
pub mod menu;
pub mod time;
pub mod traits;
