use core::fmt::Write;

use crate::syscall::{Ecall, STDOUT, Syscalls};

struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let space = self.buf.len().saturating_sub(self.pos);
        let len = core::cmp::min(s.len(), space);
        self.buf[self.pos..self.pos + len].copy_from_slice(&s.as_bytes()[..len]);
        self.pos += len;
        Ok(())
    }
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    let mut buf = [0u8; 128];
    let mut writer = BufWriter { buf: &mut buf, pos: 0 };

    if let Some(location) = info.location() {
        let _ = write!(
            &mut writer,
            "panic at {}:{}:{}: ",
            location.file(),
            location.line(),
            location.column()
        );
    }
    let _ = writeln!(&mut writer, "{}", info.message());

    let mut sys = Ecall;
    let len = writer.pos;
    sys.write(STDOUT, &buf[..len]);
    sys.exit(-1);
    loop {
        core::hint::spin_loop();
    }
}
