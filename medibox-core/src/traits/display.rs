//! Text display sink trait

/// Trait for the monochrome status display
///
/// Coordinates are pixels on a 128x64 panel; `size` selects the glyph
/// scale (1 = small, 2 = large). Nothing is erased unless the caller
/// clears explicitly.
pub trait DisplaySink {
    /// Blank the entire panel
    fn clear(&mut self);

    /// Draw one line of text at a pixel position
    fn print_line(&mut self, text: &str, column: u8, row: u8, size: u8);
}
