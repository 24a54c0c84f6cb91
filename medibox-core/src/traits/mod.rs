//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod alert;
pub mod clock;
pub mod delay;
pub mod display;
pub mod input;
pub mod sensor;

pub use alert::AlertActuator;
pub use clock::ClockSource;
pub use delay::Delay;
pub use display::DisplaySink;
pub use input::{Button, InputReader};
pub use sensor::{EnvironmentSample, EnvironmentSensor};
