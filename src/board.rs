use crate::clock::TimeSync;
use crate::compositor::Compositor;
use crate::config::{ConfigError, SimConfig};
use crate::display::DisplayController;
use crate::luma::LumaMap;
use crate::mcu::{CoreState, Mcu};
use crate::timer::{FrameScheduler, Tick};

/// Why the emulated core stopped for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    Done,
    Crashed,
}

/// Run loop state after a burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Mid-burst; never returned to the host.
    Running,
    /// The render tick fired; control returns to the host for input and
    /// presentation, then the loop resumes.
    Yielded,
    /// Terminal. The core finished or crashed; never retried.
    Halted(HaltReason),
}

/// Composition root for the presentation layer.
///
/// Owns the scheduler, persistence map, compositor, and time sync; the
/// emulated core and its display are injected per burst through the [`Mcu`]
/// seam. Everything runs on the caller's thread in strict sequence, so no
/// state is shared and no locking exists.
pub struct Board {
    pacer: TimeSync,
    scheduler: FrameScheduler,
    luma: LumaMap,
    compositor: Compositor,
    luma_decay: u8,
    luma_inc: u8,
    yield_pending: bool,
}

impl Board {
    /// Validate the configuration and capture the simulation start time.
    /// Tick registration is relative to cycle 0, so build the board before
    /// running the core.
    pub fn new<D: DisplayController>(cfg: &SimConfig, display: &D) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            pacer: TimeSync::new(cfg.frequency_hz),
            scheduler: FrameScheduler::new(
                cfg.decay_period_cycles(),
                cfg.render_period_cycles(),
                0,
            ),
            luma: LumaMap::new(display.columns(), display.pages()),
            compositor: Compositor::new(display.columns(), display.rows(), cfg.pixel_scale)?,
            luma_decay: cfg.luma_decay,
            luma_inc: cfg.luma_inc,
            yield_pending: false,
        })
    }

    pub fn pacer(&self) -> &TimeSync {
        &self.pacer
    }

    pub fn luma(&self) -> &LumaMap {
        &self.luma
    }

    /// The last composited frame, row-major 0x00RRGGBB.
    pub fn frame(&self) -> &[u32] {
        self.compositor.frame()
    }

    pub fn frame_width(&self) -> usize {
        self.compositor.width()
    }

    pub fn frame_height(&self) -> usize {
        self.compositor.height()
    }

    /// Drive the core for one cooperative burst.
    ///
    /// Runs the core up to the next tick deadline, fires all due ticks in
    /// non-decreasing cycle order, and repeats until the render tick yields or
    /// the core halts. The yield flag is consumed here, synchronously, so at
    /// most one rendered frame is in flight per burst. `present` is invoked
    /// once per render tick with the finished frame.
    pub fn run_burst<M: Mcu>(
        &mut self,
        mcu: &mut M,
        present: &mut dyn FnMut(&[u32]),
    ) -> LoopState {
        let mut state = LoopState::Running;
        while state == LoopState::Running {
            let target = self.scheduler.next_deadline();
            match mcu.run_until(target, &self.pacer) {
                CoreState::Running => {}
                CoreState::Done => {
                    state = LoopState::Halted(HaltReason::Done);
                    break;
                }
                CoreState::Crashed => {
                    state = LoopState::Halted(HaltReason::Crashed);
                    break;
                }
            }

            let now = mcu.cycle();
            let display = mcu.display();
            let luma = &mut self.luma;
            let compositor = &mut self.compositor;
            let yield_pending = &mut self.yield_pending;
            let (decay, inc) = (self.luma_decay, self.luma_inc);
            self.scheduler.run_due(now, |tick| match tick {
                Tick::Decay => luma.decay_and_reinforce(display, decay, inc),
                Tick::Render => {
                    compositor.render(luma, display);
                    present(compositor.frame());
                    *yield_pending = true;
                }
            });

            if self.yield_pending {
                self.yield_pending = false;
                state = LoopState::Yielded;
            }
        }
        state
    }
}
