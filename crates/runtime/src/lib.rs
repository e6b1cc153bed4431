#![cfg_attr(not(test), no_std)]
//! Freestanding runtime for a single hosted application.
//!
//! The kernel underneath offers a handful of register-based syscalls, a
//! keyboard snapshot device and a framebuffer device. This crate turns
//! that into memory allocation, formatted output, buffered files with
//! seeking, key events and frame pacing, all reachable from a
//! [`Runtime`] value.

pub mod syscall;
pub mod global;
pub mod allocator;
pub mod printf;
pub mod console;
#[macro_use]
pub mod log;
pub mod scan;
pub mod stdlib;
pub mod error;
pub mod config;
pub mod fs;
pub mod input;
pub mod timer;
pub mod platform;
#[macro_use]
pub mod entrypoint;

#[cfg(all(target_os = "none", any(target_arch = "riscv32", target_arch = "riscv64")))]
mod panic;

pub use config::Config;
pub use error::{Error, Result};
pub use platform::Runtime;
pub use printf::Arg;
pub use types::{KeyEvent, TimeSpec};
