//! Push-button input trait

/// Logical front-panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Ok,
    Cancel,
}

/// Trait for the four-button input device
///
/// Implementations own the electrical side (pull-ups, active-low
/// reads). The debounce pause after each observed press belongs to the
/// calling workflow, not the reader.
pub trait InputReader {
    /// Instantaneous pressed state of a single button
    fn is_pressed(&mut self, button: Button) -> bool;

    /// Block until any button is observed pressed and return it
    fn wait_for_press(&mut self) -> Button;
}
