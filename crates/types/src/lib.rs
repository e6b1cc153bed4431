#![cfg_attr(not(test), no_std)]
//! ABI shared between the freestanding runtime and whatever kernel services
//! its system calls. Nothing in here performs I/O; it only fixes numbers,
//! layouts and the trap seam both sides agree on.

pub mod sys_call;
pub use sys_call::Trap;

pub mod time;
pub use time::TimeSpec;

pub mod flags;
pub use flags::OpenFlags;

pub mod keys;
pub use keys::KeyEvent;

pub mod device;
