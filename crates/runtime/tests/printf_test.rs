#[path = "common/fixture.rs"]
mod fixture;

use hostkernel::HostKernel;
use runtime::console::{self, Console};
use runtime::printf::{snprintf, sprintf, Arg};
use runtime::{args, logf};

fn fmt(format: &str, args: &[Arg]) -> String {
    let mut buf = [0u8; 256];
    let n = snprintf(&mut buf, format, args);
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

#[test]
fn test_width_and_precision() {
    println!("=== Testing integer padding ===");
    assert_eq!(fmt("%5d", args!(42)), "   42");
    assert_eq!(fmt("%-5d", args!(42)), "42   ");
    assert_eq!(fmt("%05d", args!(42)), "00042");
    assert_eq!(fmt("%.3d", args!(7)), "007");
    assert_eq!(fmt("%05d", args!(-42)), "-0042");
    assert_eq!(fmt("%5.3d", args!(7)), "  007");
    assert_eq!(fmt("%05.3d", args!(7)), "  007");
    assert_eq!(fmt("%-6.2d|", args!(-3)), "-03   |");
    println!("✓ padding rules hold");
}

#[test]
fn test_conversions() {
    assert_eq!(fmt("%x", args!(255)), "ff");
    assert_eq!(fmt("%X", args!(255u32)), "FF");
    assert_eq!(fmt("%u", args!(-1)), "4294967295");
    assert_eq!(fmt("%d", args!(i32::MIN)), "-2147483648");
    assert_eq!(fmt("%i", args!(0)), "0");
    assert_eq!(fmt("%c%c", args!('o', b'k')), "ok");
    assert_eq!(fmt("%3c|", args!('x')), "  x|");
    assert_eq!(fmt("100%%", &[]), "100%");
    assert_eq!(fmt("%p", args!(0x1000usize as *const u8)), "0x1000");
}

#[test]
fn test_length_modifiers() {
    let big: i64 = (1 << 32) + 5;
    assert_eq!(fmt("%d", args!(big)), "5");
    assert_eq!(fmt("%ld", args!(big)), "4294967301");
    assert_eq!(fmt("%lld", args!(-big)), "-4294967301");
    assert_eq!(fmt("%zu", args!(usize::MAX as u64)), u64::MAX.to_string());
    assert_eq!(fmt("%lx", args!(0xdead_beef_cafe_u64)), "deadbeefcafe");
}

#[test]
fn test_strings() {
    assert_eq!(fmt("%s", &[Arg::Str(None)]), "(null)");
    assert_eq!(fmt("%s", args!(None::<&str>)), "(null)");
    assert_eq!(fmt("[%6s]", args!("ab")), "[    ab]");
    assert_eq!(fmt("[%-6s]", args!("ab")), "[ab    ]");
    assert_eq!(fmt("[%06s]", args!("ab")), "[    ab]");
    assert_eq!(fmt("%.2s", args!("abcdef")), "ab");
    assert_eq!(fmt("%-8.8s|", args!(b"E1M1\0\0\0\0")), "E1M1    |");
    assert_eq!(fmt("%s", args!(42)), "(null)");
}

#[test]
fn test_malformed_directives_are_echoed() {
    assert_eq!(fmt("%q", &[]), "%q");
    assert_eq!(fmt("%-5q", &[]), "%q");
    assert_eq!(fmt("tail %", &[]), "tail %");
    assert_eq!(fmt("%d %d", args!(1)), "1 0");
}

#[test]
fn test_truncation_keeps_terminator() {
    println!("=== Testing truncation ===");
    let mut buf = [0xffu8; 8];
    let n = snprintf(&mut buf, "hello world %d", args!(42));
    assert_eq!(n, 14);
    assert_eq!(&buf, b"hello w\0");

    let mut empty: [u8; 0] = [];
    assert_eq!(snprintf(&mut empty, "abc", &[]), 3);

    let mut one = [0xffu8; 1];
    assert_eq!(snprintf(&mut one, "abc", &[]), 3);
    assert_eq!(one[0], 0);
    println!("✓ full length reported, buffer terminated");
}

#[test]
fn test_console_flushes_per_line() {
    let kernel = HostKernel::new();
    let mut sys = kernel.clone();

    let n = console::printf(&mut sys, "a=%d\nb=%s\n", args!(1, "two"));
    assert_eq!(n, 10);
    assert_eq!(kernel.console(), "a=1\nb=two\n");
    assert_eq!(kernel.counters().write, 2);

    console::printf(&mut sys, "no newline", &[]);
    assert_eq!(kernel.counters().write, 3);
    assert_eq!(kernel.console(), "a=1\nb=two\nno newline");
}

#[test]
fn test_putchar_and_sprintf() {
    let kernel = HostKernel::new();
    let mut sys = kernel.clone();
    assert_eq!(console::putchar(&mut sys, b'!'), b'!');
    assert_eq!(kernel.console(), "!");
    assert_eq!(kernel.counters().write, 1);

    let mut name = [0u8; 16];
    let n = sprintf(&mut name, "map%02d", args!(7));
    assert_eq!(&name[..n + 1], b"map07\0");
}

#[test]
fn test_console_fmt_write_and_long_lines() {
    use core::fmt::Write;

    let kernel = HostKernel::new();
    let mut sys = kernel.clone();
    {
        let mut out = Console::stdout(&mut sys);
        write!(out, "{}-{}", "rust", 2024).unwrap();
        out.flush();
    }
    assert_eq!(kernel.console(), "rust-2024");

    let long = "x".repeat(1500);
    console::printf(&mut sys, "%s", args!(long.as_str()));
    assert_eq!(kernel.console().len(), 9 + 1500);
    assert_eq!(kernel.counters().write, 3);
}

#[test]
fn test_log_macros() {
    let kernel = HostKernel::new();
    let mut sys = kernel.clone();
    logf!(sys, "opened %s as %d\n", "doom1.wad", 3);
    runtime::log!(sys, "ready");
    logf!(sys, "plain\n");
    assert_eq!(kernel.console(), "opened doom1.wad as 3\nready\nplain\n");
}

#[test]
fn test_fprintf_to_file() {
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen("/saves/log.txt", "w").unwrap();
    rt.fprintf(file, "%s=%04d\n", args!("score", 77)).unwrap();
    rt.fclose(file).unwrap();
    assert_eq!(kernel.file("log.txt").unwrap(), b"score=0077\n");
}
