use crate::config::ConfigError;
use crate::display::DisplayController;
use crate::luma::LumaMap;

const BLACK: u32 = 0x0000_0000;

/// Display opacity derived from the contrast register, in [0.5, 1.0].
///
/// The physical screen stays faintly visible even at zero contrast, so the
/// mapping never reaches full transparency: contrast 0 yields exactly 0.5 and
/// contrast 255 exactly 1.0.
pub fn contrast_to_opacity(contrast: u8) -> f32 {
    f32::from(contrast) / 510.0 + 0.5
}

/// Software compositor that turns the persistence map into a displayable
/// frame.
///
/// Output is a `columns * scale` by `rows * scale` grid of 0x00RRGGBB pixels,
/// one constant-colored block per display pixel, alpha-composited over the
/// controller's background color. The compositor only reads the persistence
/// map and the controller state; it never mutates either.
pub struct Compositor {
    columns: usize,
    rows: usize,
    scale: usize,
    frame: Vec<u32>,
}

impl Compositor {
    /// A zero pixel scale would be a degenerate draw, so it is rejected here
    /// rather than at render time.
    pub fn new(columns: usize, rows: usize, scale: u32) -> Result<Self, ConfigError> {
        if scale == 0 {
            return Err(ConfigError::InvalidPixelScale(scale));
        }
        let scale = scale as usize;
        Ok(Self {
            columns,
            rows,
            scale,
            frame: vec![BLACK; columns * scale * rows * scale],
        })
    }

    /// Frame width in host pixels.
    pub fn width(&self) -> usize {
        self.columns * self.scale
    }

    /// Frame height in host pixels.
    pub fn height(&self) -> usize {
        self.rows * self.scale
    }

    /// The last rendered frame, row-major 0x00RRGGBB.
    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    /// Composite the persistence map under the controller's current
    /// orientation, invert, and contrast state.
    pub fn render<D: DisplayController>(&mut self, luma: &LumaMap, display: &D) {
        if !display.display_on() {
            self.frame.fill(BLACK);
            return;
        }

        let opacity = contrast_to_opacity(display.contrast());
        let invert = display.inverted();
        let hflip = display.segment_remap();
        let vflip = display.com_scan_reversed();

        // Invert swaps which of black/white is background vs foreground. The
        // background is blended at the derived opacity over the cleared frame.
        let bg = if invert { opacity } else { 0.0 };
        let fg = if invert { 0.0 } else { 1.0 };

        for y in 0..self.rows {
            let src_y = if vflip { self.rows - 1 - y } else { y };
            for x in 0..self.columns {
                let src_x = if hflip { self.columns - 1 - x } else { x };
                let alpha = f32::from(luma.intensity(src_x, src_y)) / 255.0 * opacity;
                let level = fg * alpha + bg * (1.0 - alpha);
                self.fill_block(x, y, grey(level));
            }
        }
    }

    fn fill_block(&mut self, x: usize, y: usize, px: u32) {
        let width = self.columns * self.scale;
        for dy in 0..self.scale {
            let start = (y * self.scale + dy) * width + x * self.scale;
            self.frame[start..start + self.scale].fill(px);
        }
    }
}

fn grey(level: f32) -> u32 {
    let v = (level.clamp(0.0, 1.0) * 255.0).round() as u32;
    (v << 16) | (v << 8) | v
}
