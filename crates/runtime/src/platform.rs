//! The process context: everything the application touches goes through
//! one `Runtime` value instead of process-wide globals.

use core::ptr::NonNull;

use types::KeyEvent;

use crate::allocator::Arena;
use crate::config::Config;
use crate::console;
use crate::error::Result;
use crate::fs::{FileId, FileTable, Whence};
use crate::input::InputBridge;
use crate::printf::Arg;
use crate::stdlib::Rand;
use crate::syscall::Trap;
use crate::timer;

pub struct Runtime<T: Trap> {
    pub sys: T,
    pub arena: Arena,
    pub files: FileTable,
    pub input: InputBridge,
    pub config: Config,
    pub rand: Rand,
}

impl<T: Trap> Runtime<T> {
    pub fn new(sys: T, arena: Arena) -> Self {
        Self::with_config(sys, arena, Config::DEFAULT)
    }

    pub fn with_config(sys: T, arena: Arena, config: Config) -> Self {
        Self {
            sys,
            arena,
            files: FileTable::new(),
            input: InputBridge::new(),
            config,
            rand: Rand::default(),
        }
    }

    // Platform entry points.

    pub fn init(&mut self) {
        self.input.open_devices(&mut self.sys);
    }

    /// Sends one frame of `width * height` RGBA pixels, then polls input.
    pub fn draw_frame(&mut self, pixels: &[u32]) {
        let len = (pixels.len() * 4).min(self.config.frame_bytes());
        // SAFETY: u32 has no padding and u8 has alignment 1.
        let bytes = unsafe { core::slice::from_raw_parts(pixels.as_ptr() as *const u8, len) };
        self.input.present(&mut self.sys, bytes);
    }

    pub fn sleep_ms(&mut self, ms: u32) {
        timer::sleep_ms(&mut self.sys, ms);
    }

    pub fn ticks_ms(&mut self) -> u32 {
        timer::ticks_ms(&mut self.sys)
    }

    pub fn get_key(&mut self) -> Option<KeyEvent> {
        self.input.next_key()
    }

    /// There is no window to retitle.
    pub fn set_window_title(&mut self, _title: &str) {}

    // Memory.

    pub fn malloc(&mut self, size: usize) -> Option<NonNull<u8>> {
        self.arena.allocate(size)
    }

    pub fn calloc(&mut self, n: usize, size: usize) -> Option<NonNull<u8>> {
        self.arena.allocate_zeroed(n, size)
    }

    /// # Safety
    /// `ptr`, when present, must come from this runtime's arena.
    pub unsafe fn realloc(&mut self, ptr: Option<NonNull<u8>>, size: usize) -> Option<NonNull<u8>> {
        unsafe { self.arena.reallocate(ptr, size) }
    }

    pub fn free(&mut self, ptr: Option<NonNull<u8>>) {
        self.arena.release(ptr);
    }

    // Files.

    pub fn fopen(&mut self, path: &str, mode: &str) -> Result<FileId> {
        self.files
            .open(&mut self.sys, &mut self.arena, &self.config, path, mode)
    }

    /// Reads up to `count` elements of `size` bytes; returns whole elements.
    pub fn fread(&mut self, buf: &mut [u8], size: usize, count: usize, file: FileId) -> usize {
        if size == 0 {
            return 0;
        }
        let total = size.saturating_mul(count).min(buf.len());
        self.files
            .read(&mut self.sys, file, &mut buf[..total])
            .map_or(0, |n| n / size)
    }

    pub fn fwrite(&mut self, buf: &[u8], size: usize, count: usize, file: FileId) -> usize {
        if size == 0 {
            return 0;
        }
        let total = size.saturating_mul(count).min(buf.len());
        self.files
            .write(&mut self.sys, file, &buf[..total])
            .map_or(0, |n| n / size)
    }

    pub fn fseek(&mut self, file: FileId, offset: i64, whence: Whence) -> Result<()> {
        self.files
            .seek(&mut self.sys, &self.config, file, offset, whence)
    }

    pub fn ftell(&self, file: FileId) -> Result<usize> {
        self.files.tell(file)
    }

    pub fn feof(&self, file: FileId) -> bool {
        self.files.eof(file)
    }

    pub fn fgets(&mut self, buf: &mut [u8], file: FileId) -> Option<usize> {
        self.files.gets(&mut self.sys, file, buf)
    }

    pub fn fclose(&mut self, file: FileId) -> Result<()> {
        self.files.close(&mut self.sys, file)
    }

    pub fn fprintf(&mut self, file: FileId, fmt: impl AsRef<[u8]>, args: &[Arg<'_>]) -> Result<usize> {
        self.files.fprintf(&mut self.sys, file, fmt, args)
    }

    // Console.

    pub fn printf(&mut self, fmt: impl AsRef<[u8]>, args: &[Arg<'_>]) -> usize {
        console::printf(&mut self.sys, fmt, args)
    }

    pub fn puts(&mut self, s: &str) -> usize {
        console::puts(&mut self.sys, s)
    }

    pub fn rand(&mut self) -> i32 {
        self.rand.rand()
    }

    pub fn srand(&mut self, seed: u32) {
        self.rand.srand(seed);
    }
}
