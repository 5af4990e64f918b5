use crate::display::DisplayController;

/// Per-pixel persistence map modeling the OLED's afterglow.
///
/// Each pixel holds an intensity in 0..=255. Every decay tick ages the whole
/// map toward zero and reinforces pixels currently lit in the controller's
/// framebuffer, giving a one-pole IIR trail per pixel: pixels that were
/// recently on stay visibly bright after the underlying bit clears and fade
/// smoothly instead of snapping off.
pub struct LumaMap {
    columns: usize,
    pages: usize,
    px: Vec<u8>,
}

impl LumaMap {
    /// Zero-initialized map sized for a pages-by-columns framebuffer.
    pub fn new(columns: usize, pages: usize) -> Self {
        Self {
            columns,
            pages,
            px: vec![0; columns * pages * 8],
        }
    }

    pub fn width(&self) -> usize {
        self.columns
    }

    pub fn height(&self) -> usize {
        self.pages * 8
    }

    pub fn intensity(&self, x: usize, y: usize) -> u8 {
        self.px[y * self.columns + x]
    }

    /// Clear all intensities, as on display reinitialization.
    pub fn reset(&mut self) {
        self.px.fill(0);
    }

    /// Age every pixel by `decay` and reinforce lit pixels by `inc`.
    ///
    /// Visits each pixel exactly once; pixels are independent, so iteration
    /// order does not matter. Decay floors at zero before reinforcement, so a
    /// dark pixel reaches the full increment in one tick. Intermediate math is
    /// `i16` to hold the -255..=510 range before clamping.
    pub fn decay_and_reinforce<D: DisplayController>(&mut self, display: &D, decay: u8, inc: u8) {
        for page in 0..self.pages {
            for col in 0..self.columns {
                let mut strip = display.vram(page, col);
                for bit in 0..8 {
                    let idx = (page * 8 + bit) * self.columns + col;
                    let mut luma = i16::from(self.px[idx]) - i16::from(decay);
                    if luma < 0 {
                        luma = 0;
                    }
                    if strip & 0x1 != 0 {
                        luma += i16::from(inc);
                    }
                    if luma > 255 {
                        luma = 255;
                    }
                    self.px[idx] = luma as u8;
                    strip >>= 1;
                }
            }
        }
    }
}
