use core::fmt::Write;
use std::cell::RefCell;
use std::ffi::{CStr, c_char};
use std::rc::Rc;

use types::sys_call::{
    CLOCK_MONOTONIC, ENOSYS, SYS_CLOCK_GETTIME, SYS_CLOSE, SYS_EXIT, SYS_OPEN, SYS_READ,
    SYS_SCHED_YIELD, SYS_WRITE, Trap,
};
use types::{OpenFlags, TimeSpec};

use crate::clock::{Clock, NANOS_PER_MILLI};
use crate::counters::SyscallCounters;
use crate::devices::{Display, Keyboard};
use crate::errno::{EBADF, EFAULT, EINVAL};
use crate::vfs::{Device, Node, Vfs};

/// Everything the kernel knows about the one process it serves.
#[derive(Default)]
pub struct Machine {
    pub vfs: Vfs,
    pub keyboard: Keyboard,
    pub display: Display,
    pub clock: Clock,
    pub console: Vec<u8>,
    pub exit_code: Option<i32>,
    pub counters: SyscallCounters,
    verbose_writer: Option<Rc<RefCell<dyn Write>>>,
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("vfs", &self.vfs)
            .field("frames", &self.display.frames)
            .field("now_ns", &self.clock.now_ns())
            .field("exit_code", &self.exit_code)
            .field(
                "verbose_writer",
                &self.verbose_writer.as_ref().map(|_| "<dyn Write>"),
            )
            .finish()
    }
}

macro_rules! trace {
    ($machine:expr, $($arg:tt)*) => {
        if let Some(writer) = &$machine.verbose_writer {
            let _ = writeln!(writer.borrow_mut(), $($arg)*);
        }
    };
}

impl Machine {
    pub fn dispatch(&mut self, id: usize, args: [usize; 3]) -> isize {
        match id {
            SYS_OPEN => self.sys_open(args),
            SYS_CLOSE => self.sys_close(args),
            SYS_READ => self.sys_read(args),
            SYS_WRITE => self.sys_write(args),
            SYS_EXIT => self.sys_exit(args),
            SYS_SCHED_YIELD => self.sys_sched_yield(),
            SYS_CLOCK_GETTIME => self.sys_clock_gettime(args),
            _ => {
                self.counters.unknown += 1;
                trace!(self, "unknown syscall {} {:?} = {}", id, args, ENOSYS);
                ENOSYS
            }
        }
    }

    fn sys_open(&mut self, args: [usize; 3]) -> isize {
        self.counters.open += 1;
        let [path_ptr, flags, ..] = args;
        if path_ptr == 0 {
            return EFAULT;
        }
        // SAFETY: the caller passes a NUL-terminated path in our address space.
        let path = unsafe { CStr::from_ptr(path_ptr as *const c_char) };
        let path = path.to_string_lossy();
        let flags = OpenFlags::from_bits_truncate(flags as u32);
        let fd = self.vfs.open(&path, flags);
        trace!(self, "open({:?}, {:#x}) = {}", path, flags.bits(), fd);
        fd
    }

    fn sys_close(&mut self, args: [usize; 3]) -> isize {
        self.counters.close += 1;
        let ret = self.vfs.close(args[0]);
        trace!(self, "close({}) = {}", args[0], ret);
        ret
    }

    fn sys_read(&mut self, args: [usize; 3]) -> isize {
        self.counters.read += 1;
        let [fd, ptr, len] = args;
        if ptr == 0 && len > 0 {
            return EFAULT;
        }
        let out: &mut [u8] = if len == 0 {
            &mut []
        } else {
            // SAFETY: the caller hands us a writable buffer of `len` bytes.
            unsafe { std::slice::from_raw_parts_mut(ptr as *mut u8, len) }
        };
        let ret = match self.vfs.node(fd) {
            Some(Node::Stdin) => 0,
            Some(Node::Device(Device::Input)) => self.keyboard.snapshot(out) as isize,
            Some(Node::File { .. }) => self.vfs.read_file(fd, out),
            _ => EBADF,
        };
        if ret > 0 {
            self.counters.bytes_read += ret as u64;
        }
        trace!(self, "read({}, {:#x}, {}) = {}", fd, ptr, len, ret);
        ret
    }

    fn sys_write(&mut self, args: [usize; 3]) -> isize {
        self.counters.write += 1;
        let [fd, ptr, len] = args;
        if ptr == 0 && len > 0 {
            return EFAULT;
        }
        let bytes: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: the caller hands us a readable buffer of `len` bytes.
            unsafe { std::slice::from_raw_parts(ptr as *const u8, len) }
        };
        let ret = match self.vfs.node(fd) {
            Some(Node::Console) => {
                self.console.extend_from_slice(bytes);
                len as isize
            }
            Some(Node::Device(Device::Display)) => {
                for (scancode, pressed) in self.display.present(bytes) {
                    self.keyboard.set(scancode, pressed);
                }
                len as isize
            }
            Some(Node::File { .. }) => self.vfs.write_file(fd, bytes),
            _ => EBADF,
        };
        if ret > 0 {
            self.counters.bytes_written += ret as u64;
        }
        trace!(self, "write({}, {:#x}, {}) = {}", fd, ptr, len, ret);
        ret
    }

    fn sys_exit(&mut self, args: [usize; 3]) -> isize {
        self.counters.exit += 1;
        let code = args[0] as isize as i32;
        self.exit_code = Some(code);
        trace!(self, "exit({})", code);
        0
    }

    fn sys_sched_yield(&mut self) -> isize {
        self.counters.sched_yield += 1;
        self.clock.on_yield();
        0
    }

    fn sys_clock_gettime(&mut self, args: [usize; 3]) -> isize {
        self.counters.clock_gettime += 1;
        let [clock_id, ptr, _] = args;
        if !self.clock.available || clock_id != CLOCK_MONOTONIC {
            return EINVAL;
        }
        if ptr == 0 {
            return EFAULT;
        }
        let now = self.clock.sample();
        // SAFETY: the caller passes a writable, aligned `TimeSpec`.
        unsafe { (ptr as *mut TimeSpec).write(now) };
        0
    }
}

/// Cloneable handle to a [`Machine`]. Hand one clone to the runtime as its
/// trap and keep another to drive devices and inspect results.
#[derive(Clone, Default)]
pub struct HostKernel {
    machine: Rc<RefCell<Machine>>,
}

impl std::fmt::Debug for HostKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HostKernel").field(&self.machine.borrow()).finish()
    }
}

impl Trap for HostKernel {
    unsafe fn trap(&mut self, id: usize, args: [usize; 3]) -> isize {
        self.machine.borrow_mut().dispatch(id, args)
    }
}

impl HostKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traces every syscall to `writer`, one line each.
    pub fn with_writer(writer: Option<Rc<RefCell<dyn Write>>>) -> Self {
        let kernel = Self::new();
        kernel.machine.borrow_mut().verbose_writer = writer;
        kernel
    }

    pub fn machine(&self) -> std::cell::RefMut<'_, Machine> {
        self.machine.borrow_mut()
    }

    // Files.

    pub fn insert_file(&self, name: &str, data: impl Into<Vec<u8>>) {
        self.machine().vfs.insert(name, data.into());
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.machine.borrow().vfs.get(name).map(<[u8]>::to_vec)
    }

    /// Open descriptors keep their cursor, but further reads fail.
    pub fn remove_file(&self, name: &str) -> Option<Vec<u8>> {
        self.machine().vfs.remove(name)
    }

    /// Caps every file read, forcing short reads.
    pub fn set_read_limit(&self, limit: Option<usize>) {
        self.machine().vfs.read_limit = limit;
    }

    pub fn open_descriptors(&self) -> usize {
        self.machine.borrow().vfs.open_descriptors()
    }

    /// Makes `/dev/input` and `/dev/gpu` fail to open.
    pub fn detach_devices(&self) {
        self.machine().vfs.devices_enabled = false;
    }

    // Keyboard.

    pub fn press(&self, scancode: u8) {
        self.machine().keyboard.set(scancode, true);
    }

    pub fn release(&self, scancode: u8) {
        self.machine().keyboard.set(scancode, false);
    }

    pub fn set_keys(&self, states: &[u8]) {
        let mut machine = self.machine();
        let n = states.len().min(machine.keyboard.states.len());
        machine.keyboard.states[..n].copy_from_slice(&states[..n]);
    }

    /// Cuts keyboard snapshots short.
    pub fn set_snapshot_limit(&self, limit: Option<usize>) {
        self.machine().keyboard.snapshot_limit = limit;
    }

    /// Applies a key change right after frame number `frame` is presented.
    pub fn schedule_key(&self, frame: u64, scancode: u8, pressed: bool) {
        self.machine().display.schedule(frame, scancode, pressed);
    }

    // Display.

    pub fn frames(&self) -> u64 {
        self.machine.borrow().display.frames
    }

    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.machine.borrow().display.last_frame.clone()
    }

    // Clock.

    pub fn now_ns(&self) -> u64 {
        self.machine.borrow().clock.now_ns()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns() / NANOS_PER_MILLI
    }

    pub fn advance_ms(&self, ms: u64) {
        self.machine().clock.advance_ns(ms * NANOS_PER_MILLI);
    }

    pub fn set_yield_step_ns(&self, ns: u64) {
        self.machine().clock.yield_step_ns = ns;
    }

    pub fn set_sample_step_ns(&self, ns: u64) {
        self.machine().clock.sample_step_ns = ns;
    }

    pub fn set_clock_available(&self, available: bool) {
        self.machine().clock.available = available;
    }

    // Process.

    pub fn console(&self) -> String {
        String::from_utf8_lossy(&self.machine.borrow().console).into_owned()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.machine.borrow().exit_code
    }

    pub fn counters(&self) -> SyscallCounters {
        self.machine.borrow().counters.clone()
    }
}
