//! Number parsing and the pseudo-random generator the application expects.

fn digit_value(b: u8, base: u32) -> Option<u32> {
    (b as char).to_digit(base)
}

/// `strtol`: optional leading whitespace and sign, then digits in `base`
/// (2 to 36, or 0 to detect a `0x` prefix). Returns the value and how many
/// bytes were consumed; zero consumed means nothing parsed, which is also
/// the answer for any other base.
pub fn strtol(s: &[u8], base: u32) -> (i64, usize) {
    if base != 0 && !(2..=36).contains(&base) {
        return (0, 0);
    }
    let mut i = 0;
    while s.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    let neg = match s.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let has_hex_prefix =
        s.get(i) == Some(&b'0') && matches!(s.get(i + 1), Some(b'x' | b'X'))
            && s.get(i + 2).is_some_and(|b| b.is_ascii_hexdigit());
    let base = match base {
        0 if has_hex_prefix => 16,
        0 => 10,
        b => b,
    };
    if base == 16 && has_hex_prefix {
        i += 2;
    }

    let start = i;
    let mut value: i64 = 0;
    while let Some(d) = s.get(i).and_then(|&b| digit_value(b, base)) {
        value = value.wrapping_mul(base as i64).wrapping_add(d as i64);
        i += 1;
    }
    if i == start {
        return (0, 0);
    }
    (if neg { value.wrapping_neg() } else { value }, i)
}

pub fn atoi(s: &[u8]) -> i32 {
    strtol(s, 10).0 as i32
}

/// Linear congruential generator, 15-bit output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rand {
    seed: u32,
}

impl Default for Rand {
    fn default() -> Self {
        Self { seed: 12345 }
    }
}

impl Rand {
    pub fn srand(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn rand(&mut self) -> i32 {
        self.seed = self.seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.seed >> 16) & 0x7fff) as i32
    }
}
