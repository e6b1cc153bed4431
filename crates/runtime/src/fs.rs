//! Virtual file table.
//!
//! The kernel namespace is flat and its descriptors cannot seek, so the
//! table keeps a logical cursor per handle. Backward seeks on a plain
//! handle reopen the file and read forward again, which is slow; large
//! assets are therefore read whole into arena memory at open time and
//! served from there.

use core::ffi::CStr;
use core::ptr::NonNull;

use bitflags::bitflags;
use types::OpenFlags;

use crate::allocator::Arena;
use crate::config::Config;
use crate::error::{Error, Result, check};
use crate::printf::{Arg, snprintf};
use crate::syscall::{Syscalls, Trap};

pub const MAX_FILES: usize = 8;
/// Name buffer per handle, terminator included. Longer names are kept
/// truncated; reopening such a handle looks up the truncated name.
pub const NAME_CAP: usize = 64;
/// Longest base name accepted by `open`, terminator included.
pub const OPEN_NAME_CAP: usize = 256;
/// Formatting buffer for `fprintf`.
pub const FPRINTF_CAPACITY: usize = 1024;

const SKIP_SCRATCH: usize = 512;

bitflags! {
    /// What a mode string such as `"rb"` or `"w+"` asks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const CREATE = 1 << 2;
        const TRUNCATE = 1 << 3;
    }
}

impl Access {
    /// `+` gives read-write, `w`/`a` give write-only, anything else reads.
    /// `w` also creates and truncates, `a` also creates.
    pub fn from_mode(mode: &str) -> Self {
        let has = |c| mode.contains(c);
        let mut access = if has('+') {
            Access::READ | Access::WRITE
        } else if has('w') || has('a') {
            Access::WRITE
        } else {
            Access::READ
        };
        if has('w') {
            access |= Access::CREATE | Access::TRUNCATE;
        }
        if has('a') {
            access |= Access::CREATE;
        }
        access
    }

    pub fn open_flags(self) -> OpenFlags {
        let mut flags = match (self.contains(Access::READ), self.contains(Access::WRITE)) {
            (true, true) => OpenFlags::RDWR,
            (false, true) => OpenFlags::WRONLY,
            _ => OpenFlags::RDONLY,
        };
        if self.contains(Access::CREATE) {
            flags |= OpenFlags::CREATE;
        }
        if self.contains(Access::TRUNCATE) {
            flags |= OpenFlags::TRUNC;
        }
        flags
    }

    /// Flags for reopening an already opened file: never create or truncate.
    fn reopen_flags(self) -> OpenFlags {
        (self - (Access::CREATE | Access::TRUNCATE)).open_flags()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Set,
    Cur,
    End,
}

impl Whence {
    /// C `SEEK_SET`/`SEEK_CUR`/`SEEK_END`.
    pub fn from_raw(whence: i32) -> Option<Self> {
        match whence {
            0 => Some(Whence::Set),
            1 => Some(Whence::Cur),
            2 => Some(Whence::End),
            _ => None,
        }
    }
}

/// Index of an open slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

impl FileId {
    pub fn slot(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Cache {
    ptr: NonNull<u8>,
    len: usize,
}

impl Cache {
    fn bytes(&self) -> &[u8] {
        // Arena memory is never reclaimed, so the buffer outlives the handle.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

#[derive(Debug)]
struct Handle {
    /// `None` once a reopen has failed.
    fd: Option<usize>,
    pos: usize,
    size: Option<usize>,
    eof: bool,
    name: [u8; NAME_CAP],
    access: Access,
    cache: Option<Cache>,
}

impl Handle {
    fn name(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.name).unwrap_or(c"")
    }
}

/// Strips directory components.
fn base_name(path: &[u8]) -> &[u8] {
    let path = match path.iter().position(|&b| b == 0) {
        Some(nul) => &path[..nul],
        None => path,
    };
    match path.iter().rposition(|&b| b == b'/') {
        Some(slash) => &path[slash + 1..],
        None => path,
    }
}

pub struct FileTable {
    slots: [Option<Handle>; MAX_FILES],
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTable {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; MAX_FILES],
        }
    }

    /// Forgets every slot without touching kernel descriptors.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_cached(&self, id: FileId) -> bool {
        self.handle(id).is_ok_and(|h| h.cache.is_some())
    }

    fn handle(&self, id: FileId) -> Result<&Handle> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(Error::BadHandle)
    }

    fn handle_mut(&mut self, id: FileId) -> Result<&mut Handle> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::BadHandle)
    }

    pub fn open<T: Trap + ?Sized>(
        &mut self,
        sys: &mut T,
        arena: &mut Arena,
        config: &Config,
        path: &str,
        mode: &str,
    ) -> Result<FileId> {
        let base = base_name(path.as_bytes());
        if base.len() >= OPEN_NAME_CAP {
            return Err(Error::NameTooLong);
        }
        let mut full = [0u8; OPEN_NAME_CAP];
        full[..base.len()].copy_from_slice(base);
        let cname = CStr::from_bytes_until_nul(&full).map_err(|_| Error::NameTooLong)?;

        let access = Access::from_mode(mode);
        let fd = check(sys.open(cname, access.open_flags()))?;

        let mut name = [0u8; NAME_CAP];
        let kept = base.len().min(NAME_CAP - 1);
        name[..kept].copy_from_slice(&base[..kept]);

        let Some(slot) = self.slots.iter().position(Option::is_none) else {
            sys.close(fd);
            return Err(Error::TableFull);
        };

        let mut handle = Handle {
            fd: Some(fd),
            pos: 0,
            size: None,
            eof: false,
            name,
            access,
            cache: None,
        };

        if access == Access::READ && config.is_cached_name(base) {
            match load_cache(sys, arena, fd, config.cache_chunk) {
                Ok(cache) => {
                    handle.size = Some(cache.len);
                    handle.cache = Some(cache);
                }
                Err(0) => {}
                Err(_) => {
                    // Part of the stream is gone; start over uncached.
                    sys.close(fd);
                    handle.fd = Some(check(sys.open(handle.name(), access.reopen_flags()))?);
                }
            }
        }

        self.slots[slot] = Some(handle);
        Ok(FileId(slot))
    }

    /// Reads up to `buf.len()` bytes at the cursor; returns the byte count.
    pub fn read<T: Trap + ?Sized>(&mut self, sys: &mut T, id: FileId, buf: &mut [u8]) -> Result<usize> {
        let h = self.handle_mut(id)?;
        if let Some(cache) = h.cache {
            if h.pos >= cache.len {
                h.eof = true;
                return Ok(0);
            }
            let n = buf.len().min(cache.len - h.pos);
            buf[..n].copy_from_slice(&cache.bytes()[h.pos..h.pos + n]);
            h.pos += n;
            return Ok(n);
        }

        if buf.is_empty() {
            return Ok(0);
        }
        let Some(fd) = h.fd else {
            h.eof = true;
            return Ok(0);
        };
        let r = sys.read(fd, buf);
        if r <= 0 {
            h.eof = true;
            h.size = Some(h.pos);
            return Ok(0);
        }
        h.pos += r as usize;
        Ok(r as usize)
    }

    pub fn write<T: Trap + ?Sized>(&mut self, sys: &mut T, id: FileId, buf: &[u8]) -> Result<usize> {
        let h = self.handle_mut(id)?;
        let fd = h.fd.ok_or(Error::Detached)?;
        let r = sys.write(fd, buf);
        if r <= 0 {
            return Ok(0);
        }
        h.pos += r as usize;
        if let Some(size) = h.size.as_mut() {
            *size = (*size).max(h.pos);
        }
        Ok(r as usize)
    }

    pub fn seek<T: Trap + ?Sized>(
        &mut self,
        sys: &mut T,
        config: &Config,
        id: FileId,
        offset: i64,
        whence: Whence,
    ) -> Result<()> {
        let skip_chunk = config.skip_chunk.clamp(1, SKIP_SCRATCH);
        let h = self.handle_mut(id)?;

        let origin = match whence {
            Whence::Set => 0,
            Whence::Cur => h.pos,
            Whence::End => match h.size {
                Some(size) => size,
                None => {
                    drain(sys, h, skip_chunk);
                    h.pos
                }
            },
        };
        let target = (origin as i64).saturating_add(offset).max(0) as usize;

        if let Some(cache) = h.cache {
            h.pos = target.min(cache.len);
            h.eof = false;
            return Ok(());
        }

        if target < h.pos {
            if let Some(fd) = h.fd.take() {
                sys.close(fd);
            }
            h.pos = 0;
            let fd = sys.open(h.name(), h.access.reopen_flags());
            if fd < 0 {
                h.eof = true;
                return Err(Error::Detached);
            }
            h.fd = Some(fd as usize);
        }

        let fd = h.fd.ok_or(Error::Detached)?;
        let mut scratch = [0u8; SKIP_SCRATCH];
        while h.pos < target {
            let want = (target - h.pos).min(skip_chunk);
            let r = sys.read(fd, &mut scratch[..want]);
            if r <= 0 {
                h.size = Some(h.pos);
                break;
            }
            h.pos += r as usize;
        }
        h.eof = false;
        Ok(())
    }

    pub fn tell(&self, id: FileId) -> Result<usize> {
        Ok(self.handle(id)?.pos)
    }

    /// Unknown handles read as exhausted.
    pub fn eof(&self, id: FileId) -> bool {
        self.handle(id).map_or(true, |h| h.eof)
    }

    /// Reads one line into `buf`, keeping the newline and NUL-terminating.
    /// Returns the bytes stored, or `None` when nothing could be read.
    pub fn gets<T: Trap + ?Sized>(&mut self, sys: &mut T, id: FileId, buf: &mut [u8]) -> Option<usize> {
        if buf.is_empty() {
            return None;
        }
        let mut n = 0;
        while n + 1 < buf.len() {
            let mut byte = [0u8; 1];
            if self.read(sys, id, &mut byte).ok()? == 0 {
                break;
            }
            buf[n] = byte[0];
            n += 1;
            if byte[0] == b'\n' {
                break;
            }
        }
        if n == 0 {
            return None;
        }
        buf[n] = 0;
        Some(n)
    }

    /// Closes the descriptor and frees the slot. Cache memory stays with
    /// the arena.
    pub fn close<T: Trap + ?Sized>(&mut self, sys: &mut T, id: FileId) -> Result<()> {
        let slot = self.slots.get_mut(id.0).ok_or(Error::BadHandle)?;
        let h = slot.take().ok_or(Error::BadHandle)?;
        if let Some(fd) = h.fd {
            check(sys.close(fd))?;
        }
        Ok(())
    }

    /// Formats into a bounded buffer, then issues a single write.
    pub fn fprintf<T: Trap + ?Sized>(
        &mut self,
        sys: &mut T,
        id: FileId,
        fmt: impl AsRef<[u8]>,
        args: &[Arg<'_>],
    ) -> Result<usize> {
        let mut buf = [0u8; FPRINTF_CAPACITY];
        let n = snprintf(&mut buf, fmt, args).min(FPRINTF_CAPACITY - 1);
        self.write(sys, id, &buf[..n])
    }
}

/// Reads `fd` to exhaustion into one growing arena buffer. On failure
/// reports how many bytes were consumed from the descriptor.
fn load_cache<T: Trap + ?Sized>(
    sys: &mut T,
    arena: &mut Arena,
    fd: usize,
    chunk: usize,
) -> core::result::Result<Cache, usize> {
    let chunk = chunk.max(1);
    let mut ptr = arena.allocate(chunk).ok_or(0usize)?;
    let mut cap = chunk;
    let mut len = 0;
    loop {
        if cap - len < chunk {
            // SAFETY: `ptr` came from this arena.
            ptr = unsafe { arena.reallocate(Some(ptr), len + chunk) }.ok_or(len)?;
            cap = len + chunk;
        }
        let dst = unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr().add(len), chunk) };
        let r = sys.read(fd, dst);
        if r <= 0 {
            break;
        }
        len += r as usize;
    }
    Ok(Cache { ptr, len })
}

/// Reads an uncached stream to its end so its size becomes known.
fn drain<T: Trap + ?Sized>(sys: &mut T, h: &mut Handle, chunk: usize) {
    let mut scratch = [0u8; SKIP_SCRATCH];
    if let Some(fd) = h.fd {
        loop {
            let r = sys.read(fd, &mut scratch[..chunk]);
            if r <= 0 {
                break;
            }
            h.pos += r as usize;
        }
    }
    h.size = Some(h.pos);
}
