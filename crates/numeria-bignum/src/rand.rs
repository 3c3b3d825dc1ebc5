//! Random big number generation over an abstract randomness source.

use numeria_types::BnError;

use crate::bignum::BigNum;

/// A source of random bytes.
///
/// The arithmetic core never talks to the operating system directly; prime
/// search and random sampling pull bytes through this trait.
pub trait RandomSource {
    /// Fill `out` with random bytes.
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), BnError>;

    /// Return a single random byte.
    fn next_byte(&mut self) -> Result<u8, BnError> {
        let mut b = [0u8; 1];
        self.fill_bytes(&mut b)?;
        Ok(b[0])
    }
}

/// Operating-system randomness.
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), BnError> {
        getrandom::getrandom(out).map_err(|_| BnError::RandGenFail)
    }
}

impl BigNum {
    /// Generate a random value with exactly `bits` significant bits.
    ///
    /// The most significant bit is forced set; excess bits in the top byte
    /// are masked off.
    pub fn random(rng: &mut dyn RandomSource, bits: usize) -> Result<BigNum, BnError> {
        if bits == 0 {
            return Ok(BigNum::zero());
        }

        let num_bytes = bits.div_ceil(8);
        let mut buf = vec![0u8; num_bytes];
        rng.fill_bytes(&mut buf)?;

        let excess = num_bytes * 8 - bits;
        if excess > 0 {
            buf[0] &= 0xFF >> excess;
        }
        buf[0] |= 0x80 >> excess;

        Ok(BigNum::from_bytes_be(&buf))
    }

    /// Generate a uniform random value in `[0, upper)` by rejection sampling.
    pub fn random_below(rng: &mut dyn RandomSource, upper: &BigNum) -> Result<BigNum, BnError> {
        if upper.is_zero() || upper.is_negative() {
            return Err(BnError::InvalidArg);
        }

        let bits = upper.bit_len();
        let num_bytes = bits.div_ceil(8);
        let excess = num_bytes * 8 - bits;

        loop {
            let mut buf = vec![0u8; num_bytes];
            rng.fill_bytes(&mut buf)?;
            if excess > 0 {
                buf[0] &= 0xFF >> excess;
            }
            let candidate = BigNum::from_bytes_be(&buf);
            if candidate.cmp_abs(upper) == std::cmp::Ordering::Less {
                return Ok(candidate);
            }
        }
    }

    /// Generate a uniform random value in `[lo, hi)`.
    pub fn random_range(
        rng: &mut dyn RandomSource,
        lo: &BigNum,
        hi: &BigNum,
    ) -> Result<BigNum, BnError> {
        if hi <= lo {
            return Err(BnError::InvalidArg);
        }
        let range = hi.sub(lo);
        Ok(lo.add(&BigNum::random_below(rng, &range)?))
    }
}

/// Deterministic byte stream for tests.
#[cfg(test)]
pub(crate) struct FixedRng {
    state: u64,
}

#[cfg(test)]
impl FixedRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }
}

#[cfg(test)]
impl RandomSource for FixedRng {
    fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), BnError> {
        for b in out.iter_mut() {
            // xorshift64
            self.state ^= self.state << 13;
            self.state ^= self.state >> 7;
            self.state ^= self.state << 17;
            *b = self.state as u8;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_exact_bits() {
        let mut rng = FixedRng::new(7);
        for bits in [1, 7, 8, 15, 16, 63, 64, 65, 127, 128, 256] {
            let r = BigNum::random(&mut rng, bits).unwrap();
            assert_eq!(r.bit_len(), bits, "random({bits})");
        }
    }

    #[test]
    fn test_random_below_in_range() {
        let mut rng = FixedRng::new(99);
        let upper = BigNum::from_u64(1000);
        for _ in 0..200 {
            let r = BigNum::random_below(&mut rng, &upper).unwrap();
            assert!(r < upper);
        }
        assert!(BigNum::random_below(&mut rng, &BigNum::zero()).is_err());
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = FixedRng::new(3);
        let lo = BigNum::from_u64(500);
        let hi = BigNum::from_u64(520);
        for _ in 0..100 {
            let r = BigNum::random_range(&mut rng, &lo, &hi).unwrap();
            assert!(r >= lo && r < hi);
        }
        assert!(BigNum::random_range(&mut rng, &hi, &lo).is_err());
        assert!(BigNum::random_range(&mut rng, &lo, &lo).is_err());
    }

    #[test]
    fn test_os_random_fills() {
        let mut rng = OsRandom;
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf).unwrap();
        // 32 zero bytes from the OS would mean something is very wrong
        assert!(buf.iter().any(|&b| b != 0));
        let _ = rng.next_byte().unwrap();
    }
}
