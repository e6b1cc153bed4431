/// System call IDs understood by the kernel.
pub const SYS_OPEN: usize = 56;
pub const SYS_CLOSE: usize = 57;
pub const SYS_READ: usize = 63;
pub const SYS_WRITE: usize = 64;
pub const SYS_EXIT: usize = 93;
pub const SYS_CLOCK_GETTIME: usize = 113;
pub const SYS_SCHED_YIELD: usize = 124;

/// Clock id passed as the first `clock_gettime` argument.
pub const CLOCK_MONOTONIC: usize = 1;

pub const STDIN: usize = 0;
pub const STDOUT: usize = 1;
pub const STDERR: usize = 2;

/// Returned by kernels for ids they do not implement.
pub const ENOSYS: isize = -38;

/// The single trap seam between the runtime and a kernel.
///
/// An implementation places `args` in the calling convention's argument
/// slots and `id` in the identifier slot, issues one trap, and hands back
/// the first argument slot. Non-negative results are counts or descriptors,
/// negative results are failures.
pub trait Trap {
    /// # Safety
    /// Every pointer carried in `args` must be valid for the access the
    /// operation `id` performs on it (reads for `write`/`open`, writes for
    /// `read`/`clock_gettime`) for the full length given.
    unsafe fn trap(&mut self, id: usize, args: [usize; 3]) -> isize;
}

impl<T: Trap + ?Sized> Trap for &mut T {
    unsafe fn trap(&mut self, id: usize, args: [usize; 3]) -> isize {
        unsafe { (**self).trap(id, args) }
    }
}
