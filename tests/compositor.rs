mod common;

use ardu_sim::compositor::{Compositor, contrast_to_opacity};
use ardu_sim::config::ConfigError;
use ardu_sim::display::DisplayController;
use ardu_sim::luma::LumaMap;
use common::TestDisplay;

// Full reinforcement in one tick so intensities are exactly 0 or 255.
fn lit_luma(display: &TestDisplay) -> LumaMap {
    let mut luma = LumaMap::new(display.columns(), display.pages());
    luma.decay_and_reinforce(display, 0, 255);
    luma
}

#[test]
fn opacity_bounds_are_exact() {
    assert_eq!(contrast_to_opacity(0), 0.5);
    assert_eq!(contrast_to_opacity(255), 1.0);
}

#[test]
fn zero_pixel_scale_is_rejected() {
    assert!(matches!(
        Compositor::new(128, 64, 0),
        Err(ConfigError::InvalidPixelScale(0))
    ));
    assert!(Compositor::new(128, 64, 1).is_ok());
}

#[test]
fn disabled_output_clears_the_frame() {
    let mut display = TestDisplay::with_size(8, 1);
    display.contrast = 255;
    display.set_pixel(2, 2, true);
    let luma = lit_luma(&display);

    let mut comp = Compositor::new(8, 8, 1).unwrap();
    comp.render(&luma, &display);
    assert!(comp.frame().iter().any(|&px| px != 0));

    display.on = false;
    comp.render(&luma, &display);
    assert!(comp.frame().iter().all(|&px| px == 0));
}

#[test]
fn full_intensity_at_full_contrast_is_white() {
    let mut display = TestDisplay::with_size(4, 1);
    display.contrast = 255;
    display.set_pixel(1, 3, true);
    let luma = lit_luma(&display);

    let mut comp = Compositor::new(4, 8, 1).unwrap();
    comp.render(&luma, &display);
    assert_eq!(comp.frame()[3 * 4 + 1], 0x00FF_FFFF);
    assert_eq!(comp.frame()[0], 0x0000_0000);
}

#[test]
fn zero_contrast_halves_the_foreground() {
    let mut display = TestDisplay::with_size(4, 1);
    display.contrast = 0;
    display.set_pixel(0, 0, true);
    let luma = lit_luma(&display);

    let mut comp = Compositor::new(4, 8, 1).unwrap();
    comp.render(&luma, &display);
    // alpha = 1.0 * 0.5 over a black background.
    assert_eq!(comp.frame()[0], 0x0080_8080);
}

#[test]
fn inverted_background_is_opacity_grey() {
    let mut display = TestDisplay::with_size(4, 1);
    display.contrast = 0;
    display.inverted = true;
    let luma = LumaMap::new(4, 1);

    let mut comp = Compositor::new(4, 8, 1).unwrap();
    comp.render(&luma, &display);
    // No luma anywhere: every pixel shows the white background at 0.5.
    assert!(comp.frame().iter().all(|&px| px == 0x0080_8080));

    // A fully lit pixel draws the black foreground at full alpha.
    display.contrast = 255;
    let luma = lit_luma_at(&mut display, 2, 5);
    comp.render(&luma, &display);
    assert_eq!(comp.frame()[5 * 4 + 2], 0x0000_0000);
}

#[test]
fn horizontal_flip_mirrors_the_frame_exactly() {
    let mut display = TestDisplay::with_size(8, 1);
    display.contrast = 128;
    display.set_pixel(1, 2, true);
    display.set_pixel(6, 7, true);
    let mut luma = LumaMap::new(8, 1);
    // Two ticks with different patterns to get varied intensities.
    luma.decay_and_reinforce(&display, 40, 90);
    display.set_pixel(6, 7, false);
    display.set_pixel(3, 0, true);
    luma.decay_and_reinforce(&display, 40, 90);

    let mut comp = Compositor::new(8, 8, 2).unwrap();
    comp.render(&luma, &display);
    let plain: Vec<u32> = comp.frame().to_vec();

    display.hflip = true;
    comp.render(&luma, &display);
    let flipped: Vec<u32> = comp.frame().to_vec();

    let width = comp.width();
    for y in 0..comp.height() {
        for x in 0..width {
            assert_eq!(
                flipped[y * width + x],
                plain[y * width + (width - 1 - x)],
                "mismatch at ({x}, {y})"
            );
        }
    }
}

#[test]
fn vertical_flip_mirrors_rows() {
    let mut display = TestDisplay::with_size(4, 2);
    display.contrast = 200;
    display.set_pixel(0, 1, true);
    let luma = lit_luma(&display);

    let mut comp = Compositor::new(4, 16, 1).unwrap();
    comp.render(&luma, &display);
    let plain: Vec<u32> = comp.frame().to_vec();

    display.vflip = true;
    comp.render(&luma, &display);
    let flipped: Vec<u32> = comp.frame().to_vec();

    let width = comp.width();
    let height = comp.height();
    for y in 0..height {
        for x in 0..width {
            assert_eq!(
                flipped[y * width + x],
                plain[(height - 1 - y) * width + x]
            );
        }
    }
}

#[test]
fn pixel_scale_fills_uniform_blocks() {
    let mut display = TestDisplay::with_size(2, 1);
    display.contrast = 255;
    display.set_pixel(0, 0, true);
    let luma = lit_luma(&display);

    let mut comp = Compositor::new(2, 8, 3).unwrap();
    comp.render(&luma, &display);
    let width = comp.width();
    for dy in 0..3 {
        for dx in 0..3 {
            assert_eq!(comp.frame()[dy * width + dx], 0x00FF_FFFF);
        }
        // Neighboring block stays background.
        assert_eq!(comp.frame()[dy * width + 3], 0x0000_0000);
    }
}

fn lit_luma_at(display: &mut TestDisplay, x: usize, y: usize) -> LumaMap {
    display.vram.fill(0);
    display.set_pixel(x, y, true);
    lit_luma(display)
}
