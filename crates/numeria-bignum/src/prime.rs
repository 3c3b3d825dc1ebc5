//! Primality testing: trial division screens and Miller-Rabin.

use std::sync::LazyLock;

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::montgomery::MontgomeryCtx;
use crate::rand::RandomSource;
use crate::reduce::BarrettCtx;

/// Number of small primes kept for sieving.
pub(crate) const PRIME_TABLE_SIZE: usize = 6541;
const PRIME_PRODUCTS_TABLE_SIZE: usize = 256;

/// All odd primes below 2^16, in order.
pub(crate) static PRIMES: LazyLock<Vec<u16>> = LazyLock::new(|| {
    let mut composite = vec![false; 1 << 16];
    let mut out = Vec::with_capacity(PRIME_TABLE_SIZE);
    for n in 3..(1usize << 16) {
        if composite[n] {
            continue;
        }
        if n % 2 == 1 {
            out.push(n as u16);
        }
        let mut k = n * n;
        while k < (1 << 16) {
            composite[k] = true;
            k += n;
        }
    }
    debug_assert_eq!(out.len(), PRIME_TABLE_SIZE);
    out
});

/// Products of consecutive small primes, each as large as fits in a u64;
/// lets trial division screen a whole run of primes with one gcd.
pub(crate) static PRIME_PRODUCTS: LazyLock<Vec<u64>> = LazyLock::new(|| {
    let mut out = Vec::with_capacity(PRIME_PRODUCTS_TABLE_SIZE);
    let mut acc: u64 = 1;
    for &p in PRIMES.iter() {
        match acc.checked_mul(p as u64) {
            Some(next) => acc = next,
            None => {
                out.push(acc);
                acc = p as u64;
                if out.len() == PRIME_PRODUCTS_TABLE_SIZE {
                    break;
                }
            }
        }
    }
    out
});

/// Outcome of the cheap primality screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// A factor was found, or the value is out of range.
    Composite,
    /// The value is a known small prime.
    Prime,
    /// No verdict; a probabilistic test must decide.
    Unknown,
}

/// Screen a value against the small-prime tables.
///
/// Values inside the table range get a definite answer; larger odd values
/// are batch-checked by gcd against the prime products and either rejected
/// or left `Unknown`.
pub fn trial_division(n: &BigNum) -> Screen {
    if *n == BigNum::from_u64(2) {
        return Screen::Prime;
    }
    if n.is_negative() || n.is_zero() || n.is_one() || n.is_even() {
        return Screen::Composite;
    }

    let last = *PRIMES.last().unwrap() as u64;
    if n.bit_len() <= 16 && n.limb_at(0) <= last {
        return if PRIMES.binary_search(&(n.limb_at(0) as u16)).is_ok() {
            Screen::Prime
        } else {
            Screen::Composite
        };
    }

    let check = (n.bit_len() / 32).min(PRIME_PRODUCTS.len());
    for &product in &PRIME_PRODUCTS[..check.max(1)] {
        if gcd_u64(n.mod_word(product), product) != 1 {
            return Screen::Composite;
        }
    }
    Screen::Unknown
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Miller-Rabin rounds needed for a ~2^-80 error bound, by bit length.
pub(crate) fn mr_rounds(bits: usize) -> usize {
    if bits >= 1300 {
        2
    } else if bits >= 850 {
        3
    } else if bits >= 650 {
        4
    } else if bits >= 550 {
        5
    } else if bits >= 450 {
        6
    } else if bits >= 400 {
        7
    } else if bits >= 350 {
        8
    } else if bits >= 300 {
        9
    } else if bits >= 250 {
        12
    } else if bits >= 200 {
        15
    } else if bits >= 150 {
        18
    } else {
        27
    }
}

/// Miller-Rabin tester for a fixed candidate.
///
/// Decomposes n-1 = 2^s * r once and keeps both reduction contexts for n,
/// so many randomized rounds share the setup cost: the Montgomery context
/// drives the a^r exponentiation, the Barrett reducer the squaring chain.
pub struct MillerRabin {
    n: BigNum,
    n_minus_1: BigNum,
    /// Odd part of n-1.
    r: BigNum,
    /// Power-of-two exponent of n-1.
    s: usize,
    reducer: BarrettCtx,
    mont: MontgomeryCtx,
}

impl MillerRabin {
    /// Create a tester; n must be odd and greater than 2.
    pub fn new(n: &BigNum) -> Result<Self, BnError> {
        if n.is_even() || *n <= BigNum::from_u64(2) {
            return Err(BnError::InvalidArg);
        }
        let n_minus_1 = n.sub(&BigNum::one());
        let s = n_minus_1.low_zero_bits();
        let r = n_minus_1.shr(s);
        let reducer = BarrettCtx::new(n)?;
        let mont = MontgomeryCtx::new(n)?;
        Ok(MillerRabin {
            n: n.clone(),
            n_minus_1,
            r,
            s,
            reducer,
            mont,
        })
    }

    /// Run one round with base `a`; `a` must lie in [2, n-2].
    ///
    /// Returns false when `a` witnesses compositeness.
    pub fn passes_round(&self, a: &BigNum) -> Result<bool, BnError> {
        if *a < BigNum::from_u64(2) || *a > self.n.sub(&BigNum::from_u64(2)) {
            return Err(BnError::InvalidArg);
        }

        let mut y = self.mont.mont_exp(a, &self.r)?;
        if y.is_one() || y == self.n_minus_1 {
            return Ok(true);
        }

        for _ in 1..self.s {
            y = self.reducer.square(&y)?;
            // a nontrivial square root of 1 proves n composite
            if y.is_one() {
                return Ok(false);
            }
            if y == self.n_minus_1 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Run `rounds` Miller-Rabin rounds with random bases from [2, n-2].
pub fn passes_mr_tests(
    rng: &mut dyn RandomSource,
    n: &BigNum,
    rounds: usize,
) -> Result<bool, BnError> {
    if *n < BigNum::from_u64(5) {
        return Ok(*n == BigNum::from_u64(2) || *n == BigNum::from_u64(3));
    }

    let tester = MillerRabin::new(n)?;
    let lo = BigNum::from_u64(2);
    let hi = n.sub(&BigNum::one()); // exclusive, so bases stop at n-2
    for _ in 0..rounds {
        let a = BigNum::random_range(rng, &lo, &hi)?;
        if !tester.passes_round(&a)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Probabilistic primality test: trial division screen, then Miller-Rabin
/// with the round count from the error-bound table.
pub fn is_prime(rng: &mut dyn RandomSource, n: &BigNum) -> Result<bool, BnError> {
    match trial_division(n) {
        Screen::Prime => Ok(true),
        Screen::Composite => Ok(false),
        Screen::Unknown => passes_mr_tests(rng, n, mr_rounds(n.bit_len())),
    }
}

/// Like [`is_prime`] with double the rounds, for final acceptance checks.
pub fn verify_prime(rng: &mut dyn RandomSource, n: &BigNum) -> Result<bool, BnError> {
    match trial_division(n) {
        Screen::Prime => Ok(true),
        Screen::Composite => Ok(false),
        Screen::Unknown => passes_mr_tests(rng, n, 2 * mr_rounds(n.bit_len())),
    }
}
