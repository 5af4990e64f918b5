/// Read-only view of the emulated display controller's state.
///
/// The command decoder and pixel-buffer semantics of the peripheral live in
/// the emulated core; this crate only samples the resulting state at decay
/// and render tick boundaries and never writes it.
pub trait DisplayController {
    /// Number of 8-pixel-tall pages.
    fn pages(&self) -> usize;

    /// Number of columns (display width in pixels).
    fn columns(&self) -> usize;

    /// Column strip at (page, column). Bit `k` is the pixel at row
    /// `page * 8 + k`.
    fn vram(&self, page: usize, column: usize) -> u8;

    /// Contrast register value.
    fn contrast(&self) -> u8;

    /// Whether display output is enabled.
    fn display_on(&self) -> bool;

    /// Inverted display mode: swaps which of black/white is background.
    fn inverted(&self) -> bool;

    /// Segment remap flag: mirrors the image horizontally.
    fn segment_remap(&self) -> bool;

    /// Reversed COM scan direction: mirrors the image vertically.
    fn com_scan_reversed(&self) -> bool;

    /// Display height in pixels.
    fn rows(&self) -> usize {
        self.pages() * 8
    }
}
