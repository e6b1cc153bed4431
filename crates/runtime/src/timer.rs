//! Monotonic clock helpers and the frame pacer.
//!
//! The kernel has no timed sleep, so waiting is a loop of clock samples
//! and voluntary yields.

use types::TimeSpec;

use crate::syscall::{Syscalls, Trap};

/// One monotonic sample, or `None` when the clock call fails.
pub fn now<T: Trap + ?Sized>(sys: &mut T) -> Option<TimeSpec> {
    let mut tp = TimeSpec::ZERO;
    (sys.clock_gettime(&mut tp) >= 0).then_some(tp)
}

/// Returns once the clock has advanced by at least `ms`.
pub fn sleep_ms<T: Trap + ?Sized>(sys: &mut T, ms: u32) {
    let Some(start) = now(sys) else {
        sys.sched_yield();
        return;
    };
    let target = start + TimeSpec::from_millis(ms as u64);
    loop {
        match now(sys) {
            Some(t) if t >= target => return,
            Some(_) => {
                sys.sched_yield();
            }
            None => {
                sys.sched_yield();
                return;
            }
        }
    }
}

/// Milliseconds since boot, truncated to the application's 32-bit width.
pub fn ticks_ms<T: Trap + ?Sized>(sys: &mut T) -> u32 {
    now(sys).map_or(0, |t| t.as_millis() as u32)
}

pub fn time_secs<T: Trap + ?Sized>(sys: &mut T) -> i64 {
    now(sys).map_or(0, |t| t.tv_sec)
}

/// `gettimeofday`-style `(seconds, microseconds)`.
pub fn micros<T: Trap + ?Sized>(sys: &mut T) -> (i64, i64) {
    now(sys).map_or((0, 0), |t| (t.tv_sec, t.tv_nsec / 1_000))
}

/// Gives up the processor once; the duration is not honored.
pub fn usleep<T: Trap + ?Sized>(sys: &mut T, _us: u64) {
    sys.sched_yield();
}
