//! Line-buffered console writer over the gateway's `write` call.

use core::fmt;

use crate::printf::{Arg, Sink, vformat};
use crate::syscall::{STDOUT, Syscalls, Trap};

pub const CONSOLE_CAPACITY: usize = 1024;

/// Collects output into a small line buffer and hands it to the kernel on
/// every newline, when the buffer fills, and on drop.
pub struct Console<'a, T: Trap + ?Sized> {
    sys: &'a mut T,
    fd: usize,
    line: [u8; CONSOLE_CAPACITY],
    len: usize,
}

impl<'a, T: Trap + ?Sized> Console<'a, T> {
    /// stderr shares stdout on this target.
    pub fn stdout(sys: &'a mut T) -> Self {
        Self {
            sys,
            fd: STDOUT,
            line: [0; CONSOLE_CAPACITY],
            len: 0,
        }
    }

    pub fn flush(&mut self) {
        if self.len > 0 {
            self.sys.write(self.fd, &self.line[..self.len]);
            self.len = 0;
        }
    }
}

impl<T: Trap + ?Sized> Sink for Console<'_, T> {
    fn put(&mut self, byte: u8) {
        self.line[self.len] = byte;
        self.len += 1;
        if byte == b'\n' || self.len == CONSOLE_CAPACITY {
            self.flush();
        }
    }
}

impl<T: Trap + ?Sized> fmt::Write for Console<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes().for_each(|b| self.put(b));
        Ok(())
    }
}

impl<T: Trap + ?Sized> Drop for Console<'_, T> {
    fn drop(&mut self) {
        self.flush();
    }
}

pub fn printf<T: Trap + ?Sized>(sys: &mut T, fmt: impl AsRef<[u8]>, args: &[Arg<'_>]) -> usize {
    let mut console = Console::stdout(sys);
    vformat(&mut console, fmt.as_ref(), args)
}

pub fn puts<T: Trap + ?Sized>(sys: &mut T, s: &str) -> usize {
    sys.write(STDOUT, s.as_bytes());
    sys.write(STDOUT, b"\n");
    s.len() + 1
}

pub fn putchar<T: Trap + ?Sized>(sys: &mut T, c: u8) -> u8 {
    sys.write(STDOUT, &[c]);
    c
}
