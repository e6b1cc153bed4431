use serde::Serialize;

/// How often each syscall was issued, plus bytes moved.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyscallCounters {
    pub open: u64,
    pub close: u64,
    pub read: u64,
    pub write: u64,
    pub exit: u64,
    pub sched_yield: u64,
    pub clock_gettime: u64,
    pub unknown: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl SyscallCounters {
    pub fn total(&self) -> u64 {
        self.open
            + self.close
            + self.read
            + self.write
            + self.exit
            + self.sched_yield
            + self.clock_gettime
            + self.unknown
    }
}
