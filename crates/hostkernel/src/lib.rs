//! In-process kernel for running the freestanding runtime on a host.
//!
//! This crate provides a `Trap` implementation that:
//! - keeps a flat in-memory file namespace with per-descriptor cursors,
//! - exposes `/dev/input` keyboard snapshots and a `/dev/gpu` frame sink,
//! - runs a simulated monotonic clock that only moves when asked to,
//! - captures console output, the exit status and per-call counters.
//!
//! Pointers arriving through the trap are dereferenced directly, since the
//! runtime and the kernel share one address space here.

pub mod clock;
pub mod counters;
pub mod devices;
pub mod kernel;
pub mod vfs;

pub use counters::SyscallCounters;
pub use kernel::HostKernel;

/// Error results, negated errno values.
pub mod errno {
    pub const ENOENT: isize = -2;
    pub const EBADF: isize = -9;
    pub const EFAULT: isize = -14;
    pub const EACCES: isize = -13;
    pub const EMFILE: isize = -24;
    pub const EINVAL: isize = -22;
    pub use types::sys_call::ENOSYS;
}
