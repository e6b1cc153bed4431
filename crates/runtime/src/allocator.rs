//! Bump allocator over a single arena.
//!
//! Every allocation is a 16-byte header followed by a payload rounded up to
//! 16 bytes, carved from the arena's high-water mark. The mark never moves
//! backwards: `release` is a no-op and exhaustion is reported as `None`.

use core::mem::size_of;
use core::ptr::{self, NonNull};

pub const ALIGN: usize = 16;

#[cfg(target_os = "none")]
pub const ARENA_SIZE: usize = 32 * 1024 * 1024;

#[repr(C, align(16))]
struct Header {
    size: usize,
}

const HEADER: usize = size_of::<Header>();

const fn round_up(size: usize) -> Option<usize> {
    match size.checked_add(ALIGN - 1) {
        Some(v) => Some(v & !(ALIGN - 1)),
        None => None,
    }
}

#[derive(Debug)]
pub struct Arena {
    base: NonNull<u8>,
    capacity: usize,
    mark: usize,
}

impl Arena {
    /// Takes ownership of `memory` for the rest of the program. Leading bytes
    /// are skipped so the first header lands on a 16-byte boundary.
    pub fn new(memory: &'static mut [u8]) -> Self {
        let len = memory.len();
        let start = memory.as_mut_ptr();
        let skew = start.align_offset(ALIGN).min(len);
        let capacity = (len - skew) & !(ALIGN - 1);
        // SAFETY: `skew <= len`, so the pointer stays inside (or one past) the slice.
        let base = unsafe { NonNull::new_unchecked(start.add(skew)) };
        Self {
            base,
            capacity,
            mark: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.mark
    }

    fn end_ptr(&self) -> *mut u8 {
        unsafe { self.base.as_ptr().add(self.mark) }
    }

    pub fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        let rounded = round_up(size)?;
        let end = self.mark.checked_add(HEADER)?.checked_add(rounded)?;
        if end > self.capacity {
            return None;
        }
        unsafe {
            let header = self.base.as_ptr().add(self.mark) as *mut Header;
            header.write(Header { size: rounded });
            self.mark = end;
            Some(NonNull::new_unchecked(header.add(1) as *mut u8))
        }
    }

    /// Allocates `n * size` bytes and zeroes exactly that span.
    pub fn allocate_zeroed(&mut self, n: usize, size: usize) -> Option<NonNull<u8>> {
        let total = n.checked_mul(size)?;
        let ptr = self.allocate(total)?;
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, total) };
        Some(ptr)
    }

    /// Resizes an allocation.
    ///
    /// The most recent allocation shrinks or grows in place; anything else is
    /// moved to fresh space with `min(old, new)` bytes copied and the old
    /// block left dead. On failure the original block is untouched.
    ///
    /// # Safety
    /// `ptr`, when present, must have been returned by this arena.
    pub unsafe fn reallocate(
        &mut self,
        ptr: Option<NonNull<u8>>,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let Some(old) = ptr else {
            return self.allocate(new_size);
        };
        let old_size = unsafe { self.size_of(old) };
        let rounded = round_up(new_size)?;

        if unsafe { old.as_ptr().add(old_size) } == self.end_ptr() {
            if rounded <= old_size {
                return Some(old);
            }
            let grow = rounded - old_size;
            if grow > self.remaining() {
                return None;
            }
            self.mark += grow;
            unsafe { (old.as_ptr() as *mut Header).sub(1).write(Header { size: rounded }) };
            return Some(old);
        }

        let fresh = self.allocate(new_size)?;
        unsafe {
            ptr::copy_nonoverlapping(old.as_ptr(), fresh.as_ptr(), old_size.min(new_size));
        }
        Some(fresh)
    }

    /// Memory is never handed back to the arena.
    pub fn release(&mut self, _ptr: Option<NonNull<u8>>) {}

    /// Rounded payload size recorded in the allocation header.
    ///
    /// # Safety
    /// `ptr` must have been returned by this arena.
    pub unsafe fn size_of(&self, ptr: NonNull<u8>) -> usize {
        unsafe { (*(ptr.as_ptr() as *const Header).sub(1)).size }
    }

    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        let addr = ptr.as_ptr() as usize;
        let base = self.base.as_ptr() as usize;
        addr >= base + HEADER && addr <= base + self.mark
    }
}

#[cfg(target_os = "none")]
#[repr(C, align(16))]
struct ArenaSpace([u8; ARENA_SIZE]);

/// Hands out the static arena region once; later calls get `None`.
#[cfg(target_os = "none")]
pub fn take_static_arena() -> Option<&'static mut [u8]> {
    use crate::global::Handoff;

    static SPACE: Handoff<ArenaSpace> = Handoff::new(ArenaSpace([0; ARENA_SIZE]));
    SPACE.take().map(|space| &mut space.0[..])
}
