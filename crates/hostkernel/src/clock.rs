use types::TimeSpec;

pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Simulated monotonic clock.
///
/// Time only moves when the guest yields or samples it, by configurable
/// steps, or when the host advances it explicitly. Runs are reproducible.
#[derive(Debug, Clone)]
pub struct Clock {
    now_ns: u64,
    pub yield_step_ns: u64,
    pub sample_step_ns: u64,
    pub available: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            now_ns: 0,
            yield_step_ns: NANOS_PER_MILLI,
            sample_step_ns: 0,
            available: true,
        }
    }
}

impl Clock {
    pub fn now_ns(&self) -> u64 {
        self.now_ns
    }

    pub fn advance_ns(&mut self, ns: u64) {
        self.now_ns = self.now_ns.saturating_add(ns);
    }

    /// Reading the clock may itself cost time.
    pub fn sample(&mut self) -> TimeSpec {
        let t = TimeSpec::from_nanos(self.now_ns);
        self.advance_ns(self.sample_step_ns);
        t
    }

    pub fn on_yield(&mut self) {
        self.advance_ns(self.yield_step_ns);
    }
}
