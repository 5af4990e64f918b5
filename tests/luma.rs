mod common;

use ardu_sim::luma::LumaMap;
use common::TestDisplay;

const DECAY: u8 = 85;
const INC: u8 = 171;

#[test]
fn lit_pixel_rises_and_saturates() {
    let mut display = TestDisplay::with_size(8, 1);
    let mut luma = LumaMap::new(8, 1);
    display.set_pixel(3, 5, true);

    // 0 -> 171 -> 255, then saturation is idempotent.
    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_eq!(luma.intensity(3, 5), 171);
    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_eq!(luma.intensity(3, 5), 255);
    for _ in 0..4 {
        luma.decay_and_reinforce(&display, DECAY, INC);
        assert_eq!(luma.intensity(3, 5), 255);
    }
}

#[test]
fn unlit_pixel_fades_to_zero() {
    let mut display = TestDisplay::with_size(8, 1);
    let mut luma = LumaMap::new(8, 1);
    display.set_pixel(0, 0, true);
    luma.decay_and_reinforce(&display, DECAY, INC);
    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_eq!(luma.intensity(0, 0), 255);

    display.set_pixel(0, 0, false);
    let expected = [170, 85, 0, 0];
    for want in expected {
        luma.decay_and_reinforce(&display, DECAY, INC);
        assert_eq!(luma.intensity(0, 0), want);
    }
}

#[test]
fn column_strip_bits_map_to_rows() {
    // Bit k of the strip at (page, column) is the pixel at row page*8 + k.
    let mut display = TestDisplay::new();
    let mut luma = LumaMap::new(128, 8);
    display.vram[128 + 5] = 0b0010_0000; // page 1, column 5, bit 5

    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_eq!(luma.intensity(5, 13), 171);
    assert_eq!(luma.intensity(5, 12), 0);
    assert_eq!(luma.intensity(5, 14), 0);
    assert_eq!(luma.intensity(4, 13), 0);
    assert_eq!(luma.intensity(6, 13), 0);
}

#[test]
fn pixels_age_independently() {
    let mut display = TestDisplay::with_size(4, 1);
    let mut luma = LumaMap::new(4, 1);
    display.set_pixel(0, 0, true);
    display.set_pixel(1, 0, true);
    luma.decay_and_reinforce(&display, DECAY, INC);
    luma.decay_and_reinforce(&display, DECAY, INC);

    display.set_pixel(1, 0, false);
    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_eq!(luma.intensity(0, 0), 255);
    assert_eq!(luma.intensity(1, 0), 170);
    assert_eq!(luma.intensity(2, 0), 0);
}

#[test]
fn reset_clears_all_intensities() {
    let mut display = TestDisplay::with_size(4, 1);
    let mut luma = LumaMap::new(4, 1);
    display.set_pixel(2, 2, true);
    luma.decay_and_reinforce(&display, DECAY, INC);
    assert_ne!(luma.intensity(2, 2), 0);

    luma.reset();
    for y in 0..luma.height() {
        for x in 0..luma.width() {
            assert_eq!(luma.intensity(x, y), 0);
        }
    }
}
