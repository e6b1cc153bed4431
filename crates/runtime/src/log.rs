/// Formats through the runtime's printf core and writes to the console.
///
/// `logf!(sys, "opened %s as %d\n", name, fd)`; arguments go through
/// `Arg::from`, so integers, `&str`, byte strings and pointers all work.
#[macro_export]
macro_rules! logf {
    ($sys:expr, $fmt:expr) => {{
        $crate::console::printf(&mut $sys, $fmt, &[])
    }};

    ($sys:expr, $fmt:expr, $($arg:expr),+ $(,)?) => {{
        $crate::console::printf(&mut $sys, $fmt, $crate::args!($($arg),+))
    }};
}

/// Plain message plus newline.
#[macro_export]
macro_rules! log {
    ($sys:expr, $msg:expr) => {{
        $crate::console::printf(&mut $sys, "%s\n", $crate::args!($msg))
    }};
}
