use crate::clock::TimeSync;
use crate::display::DisplayController;

/// Execution state reported by the emulated core after a burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreState {
    Running,
    /// Program finished normally.
    Done,
    /// Core hit an unrecoverable fault.
    Crashed,
}

impl CoreState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CoreState::Running)
    }
}

/// Contract of the cycle-driven emulated core.
///
/// The instruction-set simulation itself lives outside this crate; the run
/// loop only needs a monotonic cycle counter, bounded execution, and read
/// access to the attached display controller.
pub trait Mcu {
    type Display: DisplayController;

    /// Monotonic cycle counter. Never runs backward.
    fn cycle(&self) -> u64;

    /// Execute until the cycle counter reaches `target` or the core halts.
    ///
    /// Whenever the core would otherwise idle it must call [`TimeSync::sync`]
    /// on `pacer` with its wake-up cycle, so that simulated time stays locked
    /// to wall-clock time.
    fn run_until(&mut self, target: u64, pacer: &TimeSync) -> CoreState;

    /// Read-only view of the attached display controller.
    fn display(&self) -> &Self::Display;
}

/// Raise/lower primitive for one interrupt line of the emulated core.
pub trait IrqLine {
    /// Drive the line to the given logical level (true = high).
    fn drive(&mut self, level: bool);
}
