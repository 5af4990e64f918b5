use std::time::{Duration, Instant};

const NS_PER_SEC: u128 = 1_000_000_000;
const US_PER_SEC: u128 = 1_000_000;

/// Convert a cycle count to elapsed nanoseconds at the given clock frequency.
pub fn cycles_to_ns(frequency_hz: u64, cycles: u64) -> u64 {
    (cycles as u128 * NS_PER_SEC / frequency_hz as u128) as u64
}

/// Convert a duration in microseconds to a cycle count at the given clock
/// frequency.
pub fn usec_to_cycles(frequency_hz: u64, us: u64) -> u64 {
    (us as u128 * frequency_hz as u128 / US_PER_SEC) as u64
}

/// Keeps simulated time locked to wall-clock time.
///
/// The default idle behavior of a free-running core lets simulated and
/// wall-clock time diverge. Instead, whenever the core would otherwise idle it
/// calls [`TimeSync::sync`] with the cycle it wants to wake at; the calling
/// thread is suspended just long enough for wall-clock time to catch up to
/// that deadline. If the emulation is running behind real time the call
/// returns immediately: lost time is never made up by running faster.
pub struct TimeSync {
    start: Instant,
    frequency_hz: u64,
}

impl TimeSync {
    /// Capture the simulation start timestamp. Call once, at setup.
    pub fn new(frequency_hz: u64) -> Self {
        Self {
            start: Instant::now(),
            frequency_hz,
        }
    }

    pub fn frequency_hz(&self) -> u64 {
        self.frequency_hz
    }

    /// Block until wall-clock time reaches `deadline_cycle` on the simulated
    /// timeline, or return immediately if it already has.
    pub fn sync(&self, deadline_cycle: u64) {
        let deadline_ns = cycles_to_ns(self.frequency_hz, deadline_cycle);
        let elapsed_ns = self.start.elapsed().as_nanos().min(u64::MAX as u128) as u64;
        let wait = sleep_needed(deadline_ns, elapsed_ns);
        if !wait.is_zero() {
            // An under-sleep only shortens the stall on the next idle request,
            // so the result is not checked or retried.
            std::thread::sleep(wait);
        }
    }
}

/// Remaining wall-clock wait for a deadline, truncated to whole microseconds.
/// Zero when the deadline has already passed.
fn sleep_needed(deadline_ns: u64, elapsed_ns: u64) -> Duration {
    if elapsed_ns >= deadline_ns {
        return Duration::ZERO;
    }
    Duration::from_micros((deadline_ns - elapsed_ns) / 1_000)
}
