#[path = "common/fixture.rs"]
mod fixture;

use fixture::{ASSET, BIN_NAME, TEXT, TEXT_NAME, WAD_NAME};
use runtime::fs::{Whence, MAX_FILES};
use runtime::Error;

fn read_exact(rt: &mut runtime::Runtime<hostkernel::HostKernel>, file: runtime::fs::FileId, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut got = 0;
    while got < len {
        let n = rt.fread(&mut out[got..], 1, len - got, file);
        if n == 0 {
            break;
        }
        got += n;
    }
    out.truncate(got);
    out
}

#[test]
fn test_overflow_open_fails_without_disturbing_others() {
    println!("=== Testing file table capacity ===");
    let (kernel, mut rt) = fixture::setup();
    for i in 0..=MAX_FILES {
        kernel.insert_file(&format!("f{}.txt", i), format!("file {}", i));
    }

    let files: Vec<_> = (0..MAX_FILES)
        .map(|i| rt.fopen(&format!("f{}.txt", i), "r").unwrap())
        .collect();
    assert_eq!(rt.files.open_count(), MAX_FILES);

    let overflow = rt.fopen(&format!("f{}.txt", MAX_FILES), "r");
    assert_eq!(overflow, Err(Error::TableFull));
    assert_eq!(kernel.open_descriptors(), MAX_FILES);

    for (i, &file) in files.iter().enumerate() {
        assert_eq!(read_exact(&mut rt, file, 64), format!("file {}", i).into_bytes());
    }

    rt.fclose(files[3]).unwrap();
    let reused = rt.fopen(&format!("f{}.txt", MAX_FILES), "r").unwrap();
    assert_eq!(reused.slot(), files[3].slot());
    println!("✓ overflow rejected, slot reused after close");
}

#[test]
fn test_cached_seek_matches_linear_read() {
    println!("=== Testing cached seeks ===");
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(WAD_NAME, "rb").unwrap();
    assert!(rt.files.is_cached(file));

    let reads_after_open = kernel.counters().read;
    let linear = read_exact(&mut rt, file, 150_000);
    assert_eq!(linear, ASSET[..150_000]);

    rt.fseek(file, 120_000, Whence::Set).unwrap();
    let tail = read_exact(&mut rt, file, 10_000);
    rt.fseek(file, 1_000, Whence::Set).unwrap();
    let head = read_exact(&mut rt, file, 10_000);
    rt.fseek(file, -2_000, Whence::Cur).unwrap();
    let overlap = read_exact(&mut rt, file, 4_000);

    assert_eq!(tail, linear[120_000..130_000]);
    assert_eq!(head, linear[1_000..11_000]);
    assert_eq!(overlap, linear[9_000..13_000]);
    assert_eq!(kernel.counters().read, reads_after_open);
    println!("✓ no kernel reads after open");
}

#[test]
fn test_cached_seek_clamps_and_clears_eof() {
    let (_kernel, mut rt) = fixture::setup();
    let file = rt.fopen(WAD_NAME, "rb").unwrap();

    rt.fseek(file, 1_000_000, Whence::Set).unwrap();
    assert_eq!(rt.ftell(file), Ok(ASSET.len()));
    let mut buf = [0u8; 8];
    assert_eq!(rt.fread(&mut buf, 1, 8, file), 0);
    assert!(rt.feof(file));

    rt.fseek(file, -4, Whence::End).unwrap();
    assert!(!rt.feof(file));
    assert_eq!(rt.fread(&mut buf, 1, 8, file), 4);
    assert_eq!(buf[..4], ASSET[ASSET.len() - 4..]);

    rt.fseek(file, -10, Whence::Set).unwrap();
    assert_eq!(rt.ftell(file), Ok(0));
}

#[test]
fn test_uncached_rewind_reproduces_contents() {
    println!("=== Testing uncached rewind ===");
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(BIN_NAME, "rb").unwrap();
    assert!(!rt.files.is_cached(file));

    let first = read_exact(&mut rt, file, ASSET.len() + 10);
    assert_eq!(first, *ASSET);
    assert_eq!(kernel.counters().open, 1);

    rt.fseek(file, 0, Whence::Set).unwrap();
    assert_eq!(rt.ftell(file), Ok(0));
    let second = read_exact(&mut rt, file, ASSET.len());
    assert_eq!(second, *ASSET);

    let counters = kernel.counters();
    assert_eq!(counters.open, 2);
    assert_eq!(counters.close, 1);
    println!("✓ rewind costs one close and one open");
}

#[test]
fn test_uncached_backward_seek_skips_forward() {
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(BIN_NAME, "r").unwrap();
    read_exact(&mut rt, file, 5_000);

    let reads = kernel.counters().read;
    rt.fseek(file, 1_500, Whence::Set).unwrap();
    // Reopen, then skip 512 + 512 + 476 bytes.
    assert_eq!(kernel.counters().read - reads, 3);
    assert_eq!(rt.ftell(file), Ok(1_500));
    assert_eq!(read_exact(&mut rt, file, 100), ASSET[1_500..1_600]);

    rt.fseek(file, 400, Whence::Cur).unwrap();
    assert_eq!(read_exact(&mut rt, file, 10), ASSET[2_000..2_010]);
}

#[test]
fn test_seek_end_on_uncached_drains_once() {
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(BIN_NAME, "rb").unwrap();

    rt.fseek(file, 0, Whence::End).unwrap();
    assert_eq!(rt.ftell(file), Ok(ASSET.len()));
    let opens = kernel.counters().open;

    let mut buf = [0u8; 16];
    assert_eq!(rt.fread(&mut buf, 1, 16, file), 0);
    assert!(rt.feof(file));

    rt.fseek(file, -16, Whence::End).unwrap();
    assert_eq!(rt.fread(&mut buf, 1, 16, file), 16);
    assert_eq!(buf[..], ASSET[ASSET.len() - 16..]);
    assert_eq!(kernel.counters().open, opens + 1);
}

#[test]
fn test_short_reads_and_element_counts() {
    let (kernel, mut rt) = fixture::setup();
    kernel.set_read_limit(Some(100));

    let plain = rt.fopen(BIN_NAME, "rb").unwrap();
    let mut buf = vec![0u8; 1_000];
    assert_eq!(rt.fread(&mut buf, 1, 1_000, plain), 100);
    assert_eq!(rt.ftell(plain), Ok(100));
    // 100 more bytes arrive, which is 25 whole 4-byte elements.
    assert_eq!(rt.fread(&mut buf, 4, 250, plain), 25);

    let cached = rt.fopen(WAD_NAME, "rb").unwrap();
    assert!(rt.files.is_cached(cached));
    assert_eq!(read_exact(&mut rt, cached, ASSET.len()), *ASSET);

    rt.fseek(cached, -6, Whence::End).unwrap();
    assert_eq!(rt.fread(&mut buf, 4, 10, cached), 1);
    assert_eq!(rt.fread(&mut buf, 4, 10, cached), 0);
    assert_eq!(rt.fread(&mut buf, 0, 10, cached), 0);
}

#[test]
fn test_cache_falls_back_when_arena_runs_out() {
    println!("=== Testing cache fallback ===");
    let kernel = fixture::kernel();
    let mut rt = fixture::runtime_on(&kernel, 100 * 1024);

    let file = rt.fopen(WAD_NAME, "rb").unwrap();
    assert!(!rt.files.is_cached(file));
    assert_eq!(kernel.counters().open, 2);
    assert_eq!(read_exact(&mut rt, file, ASSET.len()), *ASSET);
    println!("✓ reopened uncached, contents intact");
}

#[test]
fn test_only_read_only_opens_are_cached() {
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(WAD_NAME, "r+b").unwrap();
    assert!(!rt.files.is_cached(file));

    let upper = "DOOM2.WAD";
    kernel.insert_file(upper, vec![1, 2, 3]);
    let file = rt.fopen(upper, "rb").unwrap();
    assert!(rt.files.is_cached(file));
}

#[test]
fn test_open_errors() {
    let (kernel, mut rt) = fixture::setup();
    assert_eq!(rt.fopen("missing.cfg", "r"), Err(Error::Transport(-2)));

    let huge = format!("{}.lmp", "a".repeat(300));
    assert_eq!(rt.fopen(&huge, "rb"), Err(Error::NameTooLong));
    assert_eq!(kernel.counters().open, 1);

    let file = rt.fopen(&format!("/music/{}", TEXT_NAME), "r").unwrap();
    rt.fclose(file).unwrap();
    assert_eq!(rt.fclose(file), Err(Error::BadHandle));
    assert_eq!(rt.ftell(file), Err(Error::BadHandle));
    assert!(rt.feof(file));
}

#[test]
fn test_write_modes() {
    let (kernel, mut rt) = fixture::setup();
    kernel.insert_file("default.cfg", "old contents that are long");

    let file = rt.fopen("default.cfg", "w").unwrap();
    assert_eq!(kernel.file("default.cfg").unwrap(), b"");
    assert_eq!(rt.fwrite(b"key 1\nkey 2\n", 6, 2, file), 2);
    assert_eq!(rt.ftell(file), Ok(12));
    rt.fclose(file).unwrap();
    assert_eq!(kernel.file("default.cfg").unwrap(), b"key 1\nkey 2\n");

    let file = rt.fopen("new.dsg", "ab").unwrap();
    assert_eq!(rt.fwrite(&[9u8; 10], 1, 10, file), 10);
    assert_eq!(kernel.file("new.dsg").unwrap(), vec![9u8; 10]);

    let ro = rt.fopen(TEXT_NAME, "r").unwrap();
    assert_eq!(rt.fwrite(b"nope", 1, 4, ro), 0);
    assert_eq!(kernel.file(TEXT_NAME).unwrap(), *TEXT);
}

#[test]
fn test_line_reads() {
    let (_kernel, mut rt) = fixture::setup();
    let file = rt.fopen(TEXT_NAME, "r").unwrap();
    let mut line = [0u8; 64];

    assert_eq!(rt.fgets(&mut line, file), Some(11));
    assert_eq!(&line[..12], b"first line\n\0");
    assert_eq!(rt.fgets(&mut line, file), Some(7));
    assert_eq!(&line[..8], b"second\n\0");
    assert_eq!(rt.fgets(&mut line, file), Some(4));
    assert_eq!(&line[..5], b"last\0");
    assert_eq!(rt.fgets(&mut line, file), None);
    assert!(rt.feof(file));

    rt.fseek(file, 0, Whence::Set).unwrap();
    let mut small = [0u8; 5];
    assert_eq!(rt.fgets(&mut small, file), Some(4));
    assert_eq!(&small, b"firs\0");
}

#[test]
fn test_cached_line_reads_use_memory() {
    let (kernel, mut rt) = fixture::setup();
    kernel.insert_file("lines.wad", "one\ntwo\n");
    let file = rt.fopen("lines.wad", "r").unwrap();
    let reads = kernel.counters().read;

    let mut line = [0u8; 16];
    assert_eq!(rt.fgets(&mut line, file), Some(4));
    assert_eq!(rt.fgets(&mut line, file), Some(4));
    assert_eq!(&line[..4], b"two\n");
    assert_eq!(rt.fgets(&mut line, file), None);
    assert_eq!(kernel.counters().read, reads);
}

#[test]
fn test_failed_reopen_detaches_handle() {
    let (kernel, mut rt) = fixture::setup();
    let file = rt.fopen(BIN_NAME, "rb").unwrap();
    read_exact(&mut rt, file, 1_000);

    kernel.remove_file(BIN_NAME);
    assert_eq!(rt.fseek(file, 0, Whence::Set), Err(Error::Detached));

    let mut buf = [0u8; 4];
    assert_eq!(rt.fread(&mut buf, 1, 4, file), 0);
    assert!(rt.feof(file));
    assert_eq!(rt.fwrite(b"x", 1, 1, file), 0);
    rt.fclose(file).unwrap();
    assert_eq!(rt.files.open_count(), 0);
}

#[test]
fn test_long_names_open_in_full() {
    let (kernel, mut rt) = fixture::setup();
    let long = format!("{}.lmp", "b".repeat(80));
    kernel.insert_file(&long, b"long name".to_vec());

    let file = rt.fopen(&format!("/data/{}", long), "rb").unwrap();
    assert_eq!(read_exact(&mut rt, file, 32), b"long name".to_vec());
    assert_eq!(kernel.counters().open, 1);

    // Reopening looks up the 63-byte copy kept in the handle.
    assert_eq!(rt.fseek(file, 0, Whence::Set), Err(Error::Detached));
    rt.fclose(file).unwrap();
}
