//! Test-only helpers shared across module test suites.

/// Byte-slice equality with diff context: on mismatch, reports the first
/// differing index and a hex window around it instead of dumping both
/// slices whole.
#[macro_export]
macro_rules! assert_slices_eq {
    ($left:expr, $right:expr) => {
        let left = &$left[..];
        let right = &$right[..];
        if left != right {
            if left.len() != right.len() {
                panic!(
                    "slice mismatch: left len {}, right len {}",
                    left.len(),
                    right.len()
                );
            }
            for (i, (a, b)) in left.iter().zip(right.iter()).enumerate() {
                if a != b {
                    let start = i.saturating_sub(16);
                    let end = (i + 16).min(left.len());
                    panic!(
                        "slice mismatch at index {}: {:02X} != {:02X}\n left:  {:02X?}\n right: {:02X?}",
                        i, a, b, &left[start..end], &right[start..end]
                    );
                }
            }
        }
    };
}

/// Deterministic pseudo-random bytes for round-trip tests (xorshift64*).
pub fn pseudo_random_bytes(mut seed: u64, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let word = seed.wrapping_mul(0x2545_f491_4f6c_dd1d);
        for &b in word.to_le_bytes().iter() {
            if out.len() < len {
                out.push(b);
            }
        }
    }
    out
}

/// Text-like data compresses well and keeps the alphabet small; useful for
/// exercising multi-block archives without huge fixtures.
pub fn lorem_bytes(len: usize) -> Vec<u8> {
    b"lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}
