use core::ops::Add;

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// Two-field `{seconds, nanoseconds}` record filled by `clock_gettime`.
///
/// Field order matters: the derived ordering compares seconds first.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl TimeSpec {
    pub const ZERO: Self = Self { tv_sec: 0, tv_nsec: 0 };

    pub const fn from_millis(ms: u64) -> Self {
        let ms = ms as i64;
        Self {
            tv_sec: ms / 1_000,
            tv_nsec: (ms % 1_000) * NANOS_PER_MILLI,
        }
    }

    pub const fn from_nanos(ns: u64) -> Self {
        let ns = ns as i64;
        Self {
            tv_sec: ns / NANOS_PER_SEC,
            tv_nsec: ns % NANOS_PER_SEC,
        }
    }

    /// Whole milliseconds; saturates at zero for negative times.
    pub const fn as_millis(&self) -> u64 {
        let ms = self.tv_sec.saturating_mul(1_000) + self.tv_nsec / NANOS_PER_MILLI;
        if ms < 0 { 0 } else { ms as u64 }
    }
}

impl Add for TimeSpec {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut sec = self.tv_sec + rhs.tv_sec;
        let mut nsec = self.tv_nsec + rhs.tv_nsec;
        if nsec >= NANOS_PER_SEC {
            sec += nsec / NANOS_PER_SEC;
            nsec %= NANOS_PER_SEC;
        }
        Self { tv_sec: sec, tv_nsec: nsec }
    }
}
