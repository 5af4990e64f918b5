#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ardu_sim::clock::TimeSync;
use ardu_sim::display::DisplayController;
use ardu_sim::input::BUTTON_COUNT;
use ardu_sim::mcu::{CoreState, IrqLine, Mcu};

pub const COLUMNS: usize = 128;
pub const PAGES: usize = 8;

/// Poke-able display controller state standing in for the emulated
/// peripheral.
pub struct TestDisplay {
    columns: usize,
    pages: usize,
    pub vram: Vec<u8>,
    pub contrast: u8,
    pub on: bool,
    pub inverted: bool,
    pub hflip: bool,
    pub vflip: bool,
}

impl TestDisplay {
    pub fn new() -> Self {
        Self::with_size(COLUMNS, PAGES)
    }

    pub fn with_size(columns: usize, pages: usize) -> Self {
        Self {
            columns,
            pages,
            vram: vec![0; columns * pages],
            contrast: 0,
            on: true,
            inverted: false,
            hflip: false,
            vflip: false,
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        let idx = (y / 8) * self.columns + x;
        let mask = 1 << (y % 8);
        if lit {
            self.vram[idx] |= mask;
        } else {
            self.vram[idx] &= !mask;
        }
    }
}

impl DisplayController for TestDisplay {
    fn pages(&self) -> usize {
        self.pages
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn vram(&self, page: usize, column: usize) -> u8 {
        self.vram[page * self.columns + column]
    }

    fn contrast(&self) -> u8 {
        self.contrast
    }

    fn display_on(&self) -> bool {
        self.on
    }

    fn inverted(&self) -> bool {
        self.inverted
    }

    fn segment_remap(&self) -> bool {
        self.hflip
    }

    fn com_scan_reversed(&self) -> bool {
        self.vflip
    }
}

/// Interrupt line that records every level transition it is driven with.
pub struct RecordingLine {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingLine {
    pub fn new() -> (Self, Rc<RefCell<Vec<bool>>>) {
        let levels = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                levels: Rc::clone(&levels),
            },
            levels,
        )
    }
}

impl IrqLine for RecordingLine {
    fn drive(&mut self, level: bool) {
        self.levels.borrow_mut().push(level);
    }
}

/// One recording line per button plus handles to the recorded transitions.
pub fn recording_lines() -> (
    [RecordingLine; BUTTON_COUNT],
    Vec<Rc<RefCell<Vec<bool>>>>,
) {
    let mut handles = Vec::with_capacity(BUTTON_COUNT);
    let lines = std::array::from_fn(|_| {
        let (line, levels) = RecordingLine::new();
        handles.push(levels);
        line
    });
    (lines, handles)
}

/// Core that jumps straight to the requested cycle, optionally halting at a
/// scripted point.
pub struct ScriptedMcu {
    pub cycle: u64,
    pub display: TestDisplay,
    pub halt_at: Option<(u64, CoreState)>,
}

impl ScriptedMcu {
    pub fn new(display: TestDisplay) -> Self {
        Self {
            cycle: 0,
            display,
            halt_at: None,
        }
    }
}

impl Mcu for ScriptedMcu {
    type Display = TestDisplay;

    fn cycle(&self) -> u64 {
        self.cycle
    }

    fn run_until(&mut self, target: u64, _pacer: &TimeSync) -> CoreState {
        if let Some((at, state)) = self.halt_at {
            if target >= at {
                self.cycle = at;
                return state;
            }
        }
        self.cycle = target;
        CoreState::Running
    }

    fn display(&self) -> &TestDisplay {
        &self.display
    }
}
