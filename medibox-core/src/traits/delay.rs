//! Blocking delay trait

/// Trait for blocking pauses
///
/// The single pacing seam of the control loop: debounce pauses, the
/// melody cadence, and confirmation screens all go through it, so tests
/// can substitute a counting fake and never sleep.
pub trait Delay {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
