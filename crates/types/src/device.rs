//! Names and sizes of the two device files.

use core::ffi::CStr;

pub const INPUT_DEVICE: &CStr = c"/dev/input";
pub const DISPLAY_DEVICE: &CStr = c"/dev/gpu";

/// One keyboard snapshot: a byte per scancode, non-zero while held.
pub const KEY_STATES_LEN: usize = 256;

pub const BYTES_PER_PIXEL: usize = 4;

pub const fn frame_bytes(width: usize, height: usize) -> usize {
    width * height * BYTES_PER_PIXEL
}
