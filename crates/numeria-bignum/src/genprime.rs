//! Random prime generation with incremental sieving.

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::prime::{is_prime, mr_rounds, passes_mr_tests, PRIMES, PRIME_TABLE_SIZE};
use crate::rand::RandomSource;

/// Candidates tried per random starting point before redrawing.
const SIEVE_RETRIES: usize = 4096;

/// Generate a random prime of exactly `bits` bits with p = equiv (mod modulo)
/// and gcd(p - 1, coprime) = 1.
///
/// `modulo` must be even and nonzero, `equiv` odd and below `modulo`, and
/// `coprime` positive. Candidates are stepped by `modulo` with the small-prime
/// residues tracked incrementally, so each step costs a handful of word ops
/// before any big-number test runs.
pub fn random_prime(
    rng: &mut dyn RandomSource,
    bits: usize,
    coprime: &BigNum,
    equiv: u64,
    modulo: u64,
) -> Result<BigNum, BnError> {
    if bits <= 1 {
        return Err(BnError::InvalidBitLength(bits));
    } else if bits == 2 {
        return Ok(BigNum::from_u64(if rng.next_byte()? % 1 != 0 { 2 } else { 3 }));
    } else if bits == 3 {
        return Ok(BigNum::from_u64(if rng.next_byte()? % 1 != 0 { 5 } else { 7 }));
    } else if bits == 4 {
        return Ok(BigNum::from_u64(if rng.next_byte()? % 1 != 0 { 11 } else { 13 }));
    }

    if coprime.is_zero() || coprime.is_negative() {
        return Err(BnError::InvalidArg);
    }
    if modulo % 2 == 1 || modulo == 0 {
        return Err(BnError::InvalidArg);
    }
    if equiv >= modulo || equiv % 2 == 0 {
        return Err(BnError::InvalidArg);
    }

    let rounds = mr_rounds(bits);
    let one = BigNum::one();

    loop {
        let mut p = BigNum::random(rng, bits)?;
        p.set_bit(bits - 2);
        p.set_bit(0);

        let rem = p.mod_word(modulo);
        if rem != equiv {
            p = p.add_word(modulo - rem).add_word(equiv);
        }

        let sieve_size = (bits / 2).min(PRIME_TABLE_SIZE);
        let mut sieve: Vec<u64> = PRIMES[..sieve_size]
            .iter()
            .map(|&q| p.mod_word(q as u64))
            .collect();

        let mut counter = 0;
        loop {
            if counter == SIEVE_RETRIES || p.bit_len() > bits {
                break;
            }

            counter += 1;
            p = p.add_word(modulo);

            if p.bit_len() > bits {
                break;
            }

            let mut passes_sieve = true;
            for (j, r) in sieve.iter_mut().enumerate() {
                *r = (*r + modulo) % PRIMES[j] as u64;
                if *r == 0 {
                    passes_sieve = false;
                }
            }

            if !passes_sieve || p.sub(&one).gcd(coprime)? != one {
                continue;
            }
            if passes_mr_tests(rng, &p, rounds)? {
                return Ok(p);
            }
        }
    }
}

/// Generate a random odd prime of exactly `bits` bits, with no extra
/// congruence or coprimality conditions.
pub fn random_prime_simple(rng: &mut dyn RandomSource, bits: usize) -> Result<BigNum, BnError> {
    random_prime(rng, bits, &BigNum::one(), 1, 2)
}

/// Generate a random safe prime p = 2q + 1 of exactly `bits` bits, with q
/// prime as well. Only supported above 64 bits.
pub fn random_safe_prime(rng: &mut dyn RandomSource, bits: usize) -> Result<BigNum, BnError> {
    if bits <= 64 {
        return Err(BnError::InvalidBitLength(bits));
    }

    loop {
        let q = random_prime_simple(rng, bits - 1)?;
        let p = q.shl(1).add(&BigNum::one());
        if is_prime(rng, &p)? {
            return Ok(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::{trial_division, Screen};
    use crate::rand::FixedRng;

    #[test]
    fn test_tiny_bit_lengths() {
        let mut rng = FixedRng::new(1);
        assert_eq!(random_prime_simple(&mut rng, 2).unwrap(), BigNum::from_u64(3));
        assert_eq!(random_prime_simple(&mut rng, 3).unwrap(), BigNum::from_u64(7));
        assert_eq!(random_prime_simple(&mut rng, 4).unwrap(), BigNum::from_u64(13));
        assert!(matches!(
            random_prime_simple(&mut rng, 0),
            Err(BnError::InvalidBitLength(0))
        ));
        assert!(matches!(
            random_prime_simple(&mut rng, 1),
            Err(BnError::InvalidBitLength(1))
        ));
    }

    #[test]
    fn test_parameter_validation() {
        let mut rng = FixedRng::new(1);
        let one = BigNum::one();
        // modulo must be even and nonzero
        assert!(random_prime(&mut rng, 32, &one, 1, 3).is_err());
        assert!(random_prime(&mut rng, 32, &one, 1, 0).is_err());
        // equiv must be odd and below modulo
        assert!(random_prime(&mut rng, 32, &one, 2, 4).is_err());
        assert!(random_prime(&mut rng, 32, &one, 5, 4).is_err());
        // coprime must be positive
        assert!(random_prime(&mut rng, 32, &BigNum::zero(), 1, 2).is_err());
    }

    #[test]
    fn test_exact_bit_length() {
        for seed in [7u64, 19, 311] {
            let mut rng = FixedRng::new(seed);
            for bits in [16usize, 24, 33, 48] {
                let p = random_prime_simple(&mut rng, bits).unwrap();
                assert_eq!(p.bit_len(), bits, "seed {seed} bits {bits}");
                assert!(p.is_odd());
            }
        }
    }

    #[test]
    fn test_small_results_are_table_primes() {
        // anything below 2^16 can be checked against the sieve table directly
        let mut rng = FixedRng::new(23);
        for _ in 0..8 {
            let p = random_prime_simple(&mut rng, 15).unwrap();
            assert_eq!(trial_division(&p), Screen::Prime);
        }
    }

    #[test]
    fn test_congruence_condition() {
        let mut rng = FixedRng::new(99);
        let p = random_prime(&mut rng, 32, &BigNum::one(), 3, 4).unwrap();
        assert_eq!(p.mod_word(4), 3);
        assert_eq!(p.bit_len(), 32);

        let p = random_prime(&mut rng, 40, &BigNum::one(), 7, 12).unwrap();
        assert_eq!(p.mod_word(12), 7);
    }

    #[test]
    fn test_coprime_condition() {
        let mut rng = FixedRng::new(5);
        // force gcd(p - 1, 3) = 1, i.e. p != 1 (mod 3)
        let p = random_prime(&mut rng, 32, &BigNum::from_u64(3), 1, 2).unwrap();
        assert_ne!(p.mod_word(3), 1);
    }

    #[test]
    fn test_no_small_factors_and_fresh_round() {
        let mut rng = FixedRng::new(61);
        let p = random_prime_simple(&mut rng, 48).unwrap();

        // sieve every prime below 10^6 and divide
        let limit = 1_000_000usize;
        let mut composite = vec![false; limit];
        for d in 2..limit {
            if composite[d] {
                continue;
            }
            assert_ne!(p.mod_word(d as u64), 0, "{p} divisible by {d}");
            let mut k = d * d;
            while k < limit {
                composite[k] = true;
                k += d;
            }
        }

        // a round with a base the generator never drew
        let tester = crate::prime::MillerRabin::new(&p).unwrap();
        assert!(tester.passes_round(&BigNum::from_u64(2)).unwrap());
        assert!(tester.passes_round(&BigNum::from_u64(325)).unwrap());
    }

    #[test]
    fn test_safe_prime() {
        let mut rng = FixedRng::new(2);
        assert!(matches!(
            random_safe_prime(&mut rng, 64),
            Err(BnError::InvalidBitLength(64))
        ));

        let p = random_safe_prime(&mut rng, 66).unwrap();
        assert_eq!(p.bit_len(), 66);
        let q = p.sub(&BigNum::one()).shr(1);
        assert!(is_prime(&mut rng, &p).unwrap());
        assert!(is_prime(&mut rng, &q).unwrap());
    }
}
