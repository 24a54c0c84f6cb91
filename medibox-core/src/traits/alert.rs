//! Buzzer and indicator trait

/// Trait for the audible/visual alert outputs
pub trait AlertActuator {
    /// Start a continuous tone at the given frequency
    fn start_tone(&mut self, frequency_hz: u16);

    /// Silence the tone output
    fn stop_tone(&mut self);

    /// Switch the visual indicator on or off
    fn set_indicator(&mut self, on: bool);
}
