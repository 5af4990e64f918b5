/// Periodic work driven off the core's cycle timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Age the persistence map and reinforce lit pixels.
    Decay,
    /// Composite and present a frame, then yield to the host.
    Render,
}

struct Slot {
    next_fire: u64,
    period: u64,
    tick: Tick,
}

/// Self-rescheduling periodic ticks indexed by the emulator's cycle counter.
///
/// Each firing reschedules itself at `current_cycle + period`, never at the
/// missed deadline. The two cadences stay phase-independent, and a tick that
/// fires late (after a debugger pause or a long stall) performs at most one
/// catch-up firing per poll instead of a callback storm.
pub struct FrameScheduler {
    slots: Vec<Slot>,
}

impl FrameScheduler {
    /// Register the decay and render ticks, first firing one period after
    /// `start_cycle`. Periods are in cycles and must be nonzero.
    pub fn new(decay_period: u64, render_period: u64, start_cycle: u64) -> Self {
        debug_assert!(decay_period > 0 && render_period > 0);
        Self {
            slots: vec![
                Slot {
                    next_fire: start_cycle + decay_period,
                    period: decay_period,
                    tick: Tick::Decay,
                },
                Slot {
                    next_fire: start_cycle + render_period,
                    period: render_period,
                    tick: Tick::Render,
                },
            ],
        }
    }

    /// Cycle of the earliest pending tick.
    pub fn next_deadline(&self) -> u64 {
        self.slots
            .iter()
            .map(|s| s.next_fire)
            .min()
            .unwrap_or(u64::MAX)
    }

    /// Fire every tick due at `now`, in non-decreasing scheduled-cycle order,
    /// rescheduling each from the current cycle.
    pub fn run_due(&mut self, now: u64, mut fire: impl FnMut(Tick)) {
        loop {
            let due = self
                .slots
                .iter_mut()
                .filter(|s| s.next_fire <= now)
                .min_by_key(|s| s.next_fire);
            let Some(slot) = due else {
                break;
            };
            slot.next_fire = now + slot.period;
            let tick = slot.tick;
            fire(tick);
        }
    }
}
