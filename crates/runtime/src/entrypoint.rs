use crate::platform::Runtime;
use crate::syscall::{Syscalls, Trap};

/// Runs the application once on a freshly reset runtime.
///
/// Every file slot and the key queue start empty, `main` receives the fixed
/// argument list, and its status is passed to `exit`. A real kernel never
/// returns from that call; under a host kernel the status comes back here.
pub fn boot<T, F>(rt: &mut Runtime<T>, main: F) -> i32
where
    T: Trap,
    F: FnOnce(&mut Runtime<T>, &[&str]) -> i32,
{
    rt.files.reset();
    rt.input.reset();
    let argv = rt.config.argv;
    let code = main(rt, &argv);
    rt.sys.exit(code);
    code
}

/// Declares the process entry symbol for `main`.
///
/// ```ignore
/// fn main(rt: &mut Runtime<Ecall>, argv: &[&str]) -> i32 { .. }
/// runtime::entrypoint!(main);
/// ```
#[macro_export]
macro_rules! entrypoint {
    ($main:path) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _start() -> ! {
            if let Some(memory) = $crate::allocator::take_static_arena() {
                let mut rt = $crate::Runtime::new(
                    $crate::syscall::Ecall,
                    $crate::allocator::Arena::new(memory),
                );
                $crate::entrypoint::boot(&mut rt, $main);
            }
            loop {
                core::hint::spin_loop();
            }
        }
    };
}
