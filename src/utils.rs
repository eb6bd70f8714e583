/// [Szudzik pairing function][szudzik-pairing], wrapping on overflow.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// The function is a perfect pairing only while the result fits into `u64`,
/// so callers must keep full keys next to hashed ones.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// [Pairing function][pairing] for two `u64` values.
///
/// [pairing]: https://en.wikipedia.org/wiki/Pairing_function
pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Pairing function for four `u64` values.
pub fn pairing4(a: u64, b: u64, c: u64, d: u64) -> u64 {
    pairing2(pairing2(a, b), pairing2(c, d))
}

pub trait MyHash {
    /// Cheap hash used to pick a cache slot.
    fn hash(&self) -> u64;
}

impl MyHash for (u64, u64) {
    fn hash(&self) -> u64 {
        pairing2(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_is_injective_on_small_inputs() {
        let mut seen = std::collections::HashSet::new();
        for a in 0..32 {
            for b in 0..32 {
                assert!(seen.insert(pairing2(a, b)), "collision at ({}, {})", a, b);
            }
        }
        // Szudzik packs the square [0, n)^2 densely into [0, n^2).
        assert_eq!(seen.iter().max(), Some(&(32 * 32 - 1)));
    }

    #[test]
    fn test_pairing_is_order_sensitive() {
        assert_ne!(pairing2(1, 2), pairing2(2, 1));
        assert_ne!(pairing4(1, 2, 3, 4), pairing4(3, 4, 1, 2));
        assert_eq!((7u64, 9u64).hash(), pairing2(7, 9));
    }

    #[test]
    fn test_pairing_wraps() {
        let _ = pairing_szudzik(u64::MAX, u64::MAX);
        let _ = pairing4(u64::MAX, 1, u64::MAX, 2);
    }
}
