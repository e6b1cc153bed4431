//! Minimal `sscanf`: `%d`, `%x` and whitespace-delimited `%s` only.

/// Output slot for one conversion.
pub enum ScanArg<'a> {
    Int(&'a mut i32),
    Hex(&'a mut u32),
    /// Receives the word NUL-terminated, clamped to the slot length.
    Str(&'a mut [u8]),
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied().filter(|&b| b != 0)
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &[u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }
}

fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'a'..=b'f' => (b - b'a' + 10) as u32,
        _ => (b - b'A' + 10) as u32,
    }
}

/// Parses `input` against `fmt`, filling `outs` in order. Stops at the
/// first mismatch and returns how many fields were stored.
pub fn sscanf(input: &[u8], fmt: &[u8], outs: &mut [ScanArg<'_>]) -> usize {
    let mut cur = Cursor { input, pos: 0 };
    let mut outs = outs.iter_mut();
    let mut count = 0;
    let mut i = 0;

    while i < fmt.len() {
        let f = fmt[i];
        if f.is_ascii_whitespace() {
            cur.skip_space();
            i += 1;
            continue;
        }
        if f != b'%' {
            if cur.peek() != Some(f) {
                break;
            }
            cur.pos += 1;
            i += 1;
            continue;
        }

        let Some(&conv) = fmt.get(i + 1) else { break };
        i += 2;
        if conv == b'%' {
            cur.skip_space();
            if cur.peek() != Some(b'%') {
                break;
            }
            cur.pos += 1;
            continue;
        }

        cur.skip_space();
        let Some(slot) = outs.next() else { break };
        let stored = match (conv, slot) {
            (b'd', ScanArg::Int(out)) => {
                let neg = match cur.peek() {
                    Some(b'-') => {
                        cur.pos += 1;
                        true
                    }
                    Some(b'+') => {
                        cur.pos += 1;
                        false
                    }
                    _ => false,
                };
                let digits = cur.take_while(|b| b.is_ascii_digit());
                if digits.is_empty() {
                    false
                } else {
                    let v = digits
                        .iter()
                        .fold(0i32, |acc, &d| acc.wrapping_mul(10).wrapping_add((d - b'0') as i32));
                    **out = if neg { v.wrapping_neg() } else { v };
                    true
                }
            }
            (b'x', ScanArg::Hex(out)) => {
                let digits = cur.take_while(|b| b.is_ascii_hexdigit());
                if digits.is_empty() {
                    false
                } else {
                    **out = digits
                        .iter()
                        .fold(0u32, |acc, &d| acc.wrapping_mul(16).wrapping_add(hex_value(d)));
                    true
                }
            }
            (b's', ScanArg::Str(out)) => {
                let word = cur.take_while(|b| !b.is_ascii_whitespace());
                if word.is_empty() || out.is_empty() {
                    false
                } else {
                    let n = word.len().min(out.len() - 1);
                    out[..n].copy_from_slice(&word[..n]);
                    out[n] = 0;
                    true
                }
            }
            _ => false,
        };
        if !stored {
            break;
        }
        count += 1;
    }
    count
}
