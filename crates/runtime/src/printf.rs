//! printf-family formatter.
//!
//! The core walks a format string against an explicit slice of tagged
//! [`Arg`] values and emits bytes into a [`Sink`]. It always returns the
//! logical length of the output, whether or not the sink kept all of it.

/// One formatting argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Ptr(usize),
    /// `None` renders as `(null)`.
    Str(Option<&'a [u8]>),
    Char(u8),
}

macro_rules! arg_from {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::$variant(v as $wide)
            }
        })+
    };
}

arg_from!(Int as i64: i8, i16, i32, i64, isize);
arg_from!(Uint as u64: u8, u16, u32, u64, usize);

impl From<bool> for Arg<'_> {
    fn from(v: bool) -> Self {
        Arg::Int(v as i64)
    }
}

impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Arg::Char(if c.is_ascii() { c as u8 } else { b'?' })
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Arg::Str(Some(s.as_slice()))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Arg::Str(s.map(str::as_bytes))
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(p: *const T) -> Self {
        Arg::Ptr(p as usize)
    }
}

impl<T> From<*mut T> for Arg<'_> {
    fn from(p: *mut T) -> Self {
        Arg::Ptr(p as usize)
    }
}

impl Arg<'_> {
    fn as_i64(&self) -> i64 {
        match *self {
            Arg::Int(v) => v,
            Arg::Uint(v) => v as i64,
            Arg::Ptr(v) => v as i64,
            Arg::Char(c) => c as i64,
            Arg::Str(_) => 0,
        }
    }

    fn as_u64(&self) -> u64 {
        self.as_i64() as u64
    }
}

/// Byte destination for the formatter.
pub trait Sink {
    fn put(&mut self, byte: u8);
}

/// Bounded buffer sink with C truncation rules: content that does not fit
/// is counted but dropped, and the buffer is always NUL-terminated.
pub struct BufSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Writes the terminator and returns the number of bytes kept.
    pub fn finish(self) -> usize {
        if self.buf.is_empty() {
            return 0;
        }
        let end = self.pos.min(self.buf.len() - 1);
        self.buf[end] = 0;
        end
    }
}

impl Sink for BufSink<'_> {
    fn put(&mut self, byte: u8) {
        if self.pos + 1 < self.buf.len() {
            self.buf[self.pos] = byte;
        }
        self.pos += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Length {
    Int,
    Long,
    LongLong,
    Size,
}

/// Parse result for one `%` conversion.
#[derive(Clone, Copy, Debug)]
struct Directive {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    length: Length,
}

impl Directive {
    fn wide(&self) -> bool {
        self.length != Length::Int
    }
}

struct Out<'s, S: Sink> {
    sink: &'s mut S,
    count: usize,
}

impl<S: Sink> Out<'_, S> {
    fn put(&mut self, b: u8) {
        self.sink.put(b);
        self.count += 1;
    }

    fn repeat(&mut self, b: u8, n: usize) {
        for _ in 0..n {
            self.put(b);
        }
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put(b);
        }
    }
}

const DIGITS_LOWER: &[u8; 16] = b"0123456789abcdef";
const DIGITS_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Renders `v` in `base` into `tmp`, least significant digit first, then
/// reverses in place. Returns the digit count.
fn render_digits(mut v: u64, base: u64, upper: bool, tmp: &mut [u8; 24]) -> usize {
    let table = if upper { DIGITS_UPPER } else { DIGITS_LOWER };
    let mut n = 0;
    if v == 0 {
        tmp[0] = b'0';
        n = 1;
    }
    while v != 0 {
        tmp[n] = table[(v % base) as usize];
        v /= base;
        n += 1;
    }
    tmp[..n].reverse();
    n
}

fn emit_number<S: Sink>(out: &mut Out<'_, S>, d: &Directive, prefix: &[u8], digits: &[u8]) {
    let zeros = match d.precision {
        Some(p) => p.saturating_sub(digits.len()),
        None if d.zero && !d.left => d.width.saturating_sub(prefix.len() + digits.len()),
        None => 0,
    };
    let body = prefix.len() + zeros + digits.len();
    let pad = d.width.saturating_sub(body);
    if !d.left {
        out.repeat(b' ', pad);
    }
    out.bytes(prefix);
    out.repeat(b'0', zeros);
    out.bytes(digits);
    if d.left {
        out.repeat(b' ', pad);
    }
}

fn emit_text<S: Sink>(out: &mut Out<'_, S>, d: &Directive, text: &[u8]) {
    let pad = d.width.saturating_sub(text.len());
    if !d.left {
        out.repeat(b' ', pad);
    }
    out.bytes(text);
    if d.left {
        out.repeat(b' ', pad);
    }
}

fn parse_number(fmt: &[u8], i: &mut usize) -> usize {
    let mut n: usize = 0;
    while let Some(c) = fmt.get(*i).filter(|c| c.is_ascii_digit()) {
        n = n.saturating_mul(10).saturating_add((c - b'0') as usize);
        *i += 1;
    }
    n
}

/// Formats `fmt` with `args` into `sink`; returns the logical length.
pub fn vformat<S: Sink>(sink: &mut S, fmt: &[u8], args: &[Arg<'_>]) -> usize {
    let mut out = Out { sink, count: 0 };
    let mut args = args.iter();
    let mut i = 0;

    while i < fmt.len() {
        let c = fmt[i];
        i += 1;
        if c != b'%' {
            out.put(c);
            continue;
        }

        let mut d = Directive {
            left: false,
            zero: false,
            width: 0,
            precision: None,
            length: Length::Int,
        };
        loop {
            match fmt.get(i) {
                Some(b'-') => d.left = true,
                Some(b'0') => d.zero = true,
                _ => break,
            }
            i += 1;
        }
        d.width = parse_number(fmt, &mut i);
        if fmt.get(i) == Some(&b'.') {
            i += 1;
            d.precision = Some(parse_number(fmt, &mut i));
        }
        match fmt.get(i) {
            Some(b'l') if fmt.get(i + 1) == Some(&b'l') => {
                d.length = Length::LongLong;
                i += 2;
            }
            Some(b'l') => {
                d.length = Length::Long;
                i += 1;
            }
            Some(b'z') => {
                d.length = Length::Size;
                i += 1;
            }
            _ => {}
        }

        let Some(&conv) = fmt.get(i) else {
            out.put(b'%');
            break;
        };
        i += 1;

        let mut tmp = [0u8; 24];
        match conv {
            b'd' | b'i' => {
                let arg = args.next().copied().unwrap_or(Arg::Int(0));
                let v = if d.wide() {
                    arg.as_i64()
                } else {
                    arg.as_i64() as i32 as i64
                };
                let n = render_digits(v.unsigned_abs(), 10, false, &mut tmp);
                let sign: &[u8] = if v < 0 { b"-" } else { b"" };
                emit_number(&mut out, &d, sign, &tmp[..n]);
            }
            b'u' | b'x' | b'X' => {
                let arg = args.next().copied().unwrap_or(Arg::Uint(0));
                let v = if d.wide() {
                    arg.as_u64()
                } else {
                    arg.as_u64() as u32 as u64
                };
                let n = match conv {
                    b'u' => render_digits(v, 10, false, &mut tmp),
                    _ => render_digits(v, 16, conv == b'X', &mut tmp),
                };
                emit_number(&mut out, &d, b"", &tmp[..n]);
            }
            b'p' => {
                let v = args.next().map_or(0, Arg::as_u64);
                let n = render_digits(v, 16, false, &mut tmp);
                emit_number(&mut out, &d, b"0x", &tmp[..n]);
            }
            b's' => {
                let text = match args.next() {
                    Some(Arg::Str(Some(s))) => *s,
                    _ => b"(null)".as_slice(),
                };
                let text = match text.iter().position(|&b| b == 0) {
                    Some(nul) => &text[..nul],
                    None => text,
                };
                let text = match d.precision {
                    Some(p) if p < text.len() => &text[..p],
                    _ => text,
                };
                emit_text(&mut out, &d, text);
            }
            b'c' => {
                let ch = args.next().map_or(0, |a| a.as_u64() as u8);
                emit_text(&mut out, &d, &[ch]);
            }
            b'%' => out.put(b'%'),
            other => {
                out.put(b'%');
                out.put(other);
            }
        }
    }
    out.count
}

/// Bounded `snprintf`: always terminates inside `buf`, returns the length
/// the full output would have had.
pub fn snprintf(buf: &mut [u8], fmt: impl AsRef<[u8]>, args: &[Arg<'_>]) -> usize {
    let mut sink = BufSink::new(buf);
    let n = vformat(&mut sink, fmt.as_ref(), args);
    sink.finish();
    n
}

/// `sprintf` into a caller buffer; the buffer length is the capacity.
pub fn sprintf(buf: &mut [u8], fmt: impl AsRef<[u8]>, args: &[Arg<'_>]) -> usize {
    snprintf(buf, fmt, args)
}

/// Builds a `&[Arg]` from a list of expressions.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        &[$($crate::printf::Arg::from($arg)),*]
    };
}
