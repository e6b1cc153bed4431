//! Syscall gateway: typed wrappers over the raw [`Trap`].
//!
//! Each wrapper only marshals pointers and lengths into the three argument
//! slots; interpretation of the result is left to the caller.

use core::ffi::CStr;

pub use types::sys_call::*;
use types::{OpenFlags, TimeSpec};

pub trait Syscalls: Trap {
    fn open(&mut self, path: &CStr, flags: OpenFlags) -> isize {
        unsafe { self.trap(SYS_OPEN, [path.as_ptr() as usize, flags.bits() as usize, 0]) }
    }

    fn read(&mut self, fd: usize, buf: &mut [u8]) -> isize {
        unsafe { self.trap(SYS_READ, [fd, buf.as_mut_ptr() as usize, buf.len()]) }
    }

    fn write(&mut self, fd: usize, buf: &[u8]) -> isize {
        unsafe { self.trap(SYS_WRITE, [fd, buf.as_ptr() as usize, buf.len()]) }
    }

    fn close(&mut self, fd: usize) -> isize {
        unsafe { self.trap(SYS_CLOSE, [fd, 0, 0]) }
    }

    /// On a real kernel this does not come back.
    fn exit(&mut self, code: i32) -> isize {
        unsafe { self.trap(SYS_EXIT, [code as isize as usize, 0, 0]) }
    }

    fn sched_yield(&mut self) -> isize {
        unsafe { self.trap(SYS_SCHED_YIELD, [0, 0, 0]) }
    }

    fn clock_gettime(&mut self, tp: &mut TimeSpec) -> isize {
        unsafe {
            self.trap(
                SYS_CLOCK_GETTIME,
                [CLOCK_MONOTONIC, tp as *mut TimeSpec as usize, 0],
            )
        }
    }
}

impl<T: Trap + ?Sized> Syscalls for T {}

/// `ecall` trampoline: args in `a0..a2`, id in `a7`, result back in `a0`.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Ecall;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl Trap for Ecall {
    unsafe fn trap(&mut self, id: usize, args: [usize; 3]) -> isize {
        let mut a0 = args[0];
        unsafe {
            core::arch::asm!(
                "ecall",
                inlateout("a0") a0,
                in("a1") args[1],
                in("a2") args[2],
                in("a7") id,
                options(nostack),
            );
        }
        a0 as isize
    }
}
