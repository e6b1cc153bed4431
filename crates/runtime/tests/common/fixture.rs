#![allow(dead_code)]

use hostkernel::HostKernel;
use once_cell::sync::Lazy;
use runtime::allocator::Arena;
use runtime::Runtime;

pub const ARENA_BYTES: usize = 4 * 1024 * 1024;

/// Cached by extension; larger than three cache chunks.
pub const WAD_NAME: &str = "doom1.wad";
/// Same bytes under a name the runtime does not cache.
pub const BIN_NAME: &str = "data.bin";
pub const TEXT_NAME: &str = "notes.txt";

pub static ASSET: Lazy<Vec<u8>> = Lazy::new(|| {
    (0..200_000u32)
        .map(|i| (i.wrapping_mul(31) ^ (i >> 8)) as u8)
        .collect()
});

pub static TEXT: Lazy<Vec<u8>> = Lazy::new(|| b"first line\nsecond\nlast".to_vec());

/// Fresh arena over leaked heap memory; tests never give it back.
pub fn leak_arena(size: usize) -> Arena {
    Arena::new(Box::leak(vec![0u8; size].into_boxed_slice()))
}

pub fn kernel() -> HostKernel {
    let kernel = HostKernel::new();
    kernel.insert_file(WAD_NAME, ASSET.clone());
    kernel.insert_file(BIN_NAME, ASSET.clone());
    kernel.insert_file(TEXT_NAME, TEXT.clone());
    kernel
}

pub fn runtime_on(kernel: &HostKernel, arena_bytes: usize) -> Runtime<HostKernel> {
    Runtime::new(kernel.clone(), leak_arena(arena_bytes))
}

pub fn setup() -> (HostKernel, Runtime<HostKernel>) {
    let kernel = kernel();
    let rt = runtime_on(&kernel, ARENA_BYTES);
    (kernel, rt)
}
