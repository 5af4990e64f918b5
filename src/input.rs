use crate::mcu::IrqLine;

pub const BUTTON_COUNT: usize = 6;

/// Logical button lines of the handheld.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
        }
    }

    pub fn from_name(name: &str) -> Option<Button> {
        Button::ALL.into_iter().find(|b| b.name() == name)
    }
}

struct ButtonLine<L> {
    pressed: bool,
    irq: L,
}

/// Debounced, edge-triggered router from logical buttons to interrupt lines.
///
/// The physical wiring is active-low: a press drives the line to 0, a release
/// back to 1. The recorded state always equals the last polarity delivered,
/// and redundant events (key auto-repeat, duplicate releases) never
/// re-trigger the line. The emulated interrupt controller may react to every
/// edge, so a spurious re-trigger would be observable to the running program.
pub struct InputRouter<L: IrqLine> {
    lines: [ButtonLine<L>; BUTTON_COUNT],
}

impl<L: IrqLine> InputRouter<L> {
    /// Take ownership of the per-button line handles, in [`Button::ALL`]
    /// order, and pull every line high (released).
    pub fn new(lines: [L; BUTTON_COUNT]) -> Self {
        let mut lines = lines.map(|irq| ButtonLine {
            pressed: false,
            irq,
        });
        for line in &mut lines {
            line.irq.drive(true);
        }
        Self { lines }
    }

    /// Propagate a pressed/released edge to the matching interrupt line.
    /// A no-op when the button is already in the reported state.
    pub fn report_button_edge(&mut self, button: Button, pressed: bool) {
        let line = &mut self.lines[button.index()];
        if line.pressed == pressed {
            return;
        }
        line.irq.drive(!pressed);
        line.pressed = pressed;
    }

    /// Current debounced state of a button.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.lines[button.index()].pressed
    }
}
