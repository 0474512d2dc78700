//! Per-particle seeds.

/// Deterministic hash of an index into 0.0-1.0.
pub fn hash01(n: u32) -> f32 {
    let mut x = n.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_range() {
        for n in 0..1000 {
            let h = hash01(n);
            assert!((0.0..1.0).contains(&h));
        }
        assert_ne!(hash01(1), hash01(2));
    }
}
