//! GCD, modular inverse, Jacobi symbol and fused operations.

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::montgomery::MontgomeryCtx;
use crate::reduce::BarrettCtx;

impl BigNum {
    /// Greatest common divisor by the Euclidean algorithm.
    pub fn gcd(&self, other: &BigNum) -> Result<BigNum, BnError> {
        if self.is_zero() && other.is_zero() {
            return Err(BnError::InvalidArg);
        }
        if self.is_zero() {
            return Ok(other.abs());
        }
        if other.is_zero() {
            return Ok(self.abs());
        }

        let mut a = self.abs();
        let mut b = other.abs();
        if a < b {
            std::mem::swap(&mut a, &mut b);
        }

        loop {
            let (_, rem) = a.div_rem(&b)?;
            if rem.is_zero() {
                return Ok(b);
            }
            a = b;
            b = rem;
        }
    }

    /// Least common multiple: |a*b| / gcd(a, b). Zero when either side is zero.
    pub fn lcm(&self, other: &BigNum) -> Result<BigNum, BnError> {
        if self.is_zero() || other.is_zero() {
            return Ok(BigNum::zero());
        }
        let g = self.gcd(other)?;
        let (q, _) = self.abs().mul(&other.abs()).div_rem_positive(&g)?;
        Ok(q)
    }

    /// Modular inverse: self^-1 mod modulus, via the extended Euclidean
    /// algorithm. Fails with `NoInverse` when gcd(self, modulus) != 1.
    pub fn mod_inv(&self, modulus: &BigNum) -> Result<BigNum, BnError> {
        if modulus.is_zero() || modulus.is_one() || modulus.is_negative() {
            return Err(BnError::NonPositiveModulus);
        }

        let mut old_r = self.mod_reduce(modulus)?;
        if old_r.is_zero() {
            return Err(BnError::NoInverse);
        }
        let mut r = modulus.clone();
        let mut old_s = BigNum::one();
        let mut s = BigNum::zero();

        while !r.is_zero() {
            let (quotient, remainder) = old_r.div_rem(&r)?;
            old_r = r;
            r = remainder;

            let new_s = old_s.sub(&quotient.mul(&s));
            old_s = s;
            s = new_s;
        }

        if !old_r.is_one() {
            return Err(BnError::NoInverse);
        }
        old_s.mod_reduce(modulus)
    }

    /// Jacobi symbol (self / n); n must be odd and greater than 1, and self
    /// non-negative. Returns -1, 0 or 1.
    pub fn jacobi(&self, n: &BigNum) -> Result<i32, BnError> {
        if self.is_negative() {
            return Err(BnError::InvalidArg);
        }
        if n.is_even() || n <= &BigNum::one() {
            return Err(BnError::InvalidArg);
        }

        let mut a = self.clone();
        let mut n = n.clone();
        let mut j = 1;

        while n > BigNum::one() {
            a = a.mod_reduce(&n)?;

            // replace a with n - a when a > n/2, flipping for n == 3 (mod 4)
            if a > n.shr(1) {
                a = n.sub(&a);
                if n.mod_word(4) == 3 {
                    j = -j;
                }
            }
            if a.is_zero() {
                return Ok(0);
            }

            let twos = a.low_zero_bits();
            a = a.shr(twos);
            if twos % 2 == 1 {
                let n_mod_8 = n.mod_word(8);
                if n_mod_8 == 3 || n_mod_8 == 5 {
                    j = -j;
                }
            }

            // quadratic reciprocity
            if a.mod_word(4) == 3 && n.mod_word(4) == 3 {
                j = -j;
            }
            std::mem::swap(&mut a, &mut n);
        }
        Ok(j)
    }
}

/// Fused multiply-add: a*b + c. The addend must be positive.
pub fn mul_add(a: &BigNum, b: &BigNum, c: &BigNum) -> Result<BigNum, BnError> {
    if c.is_negative() || c.is_zero() {
        return Err(BnError::InvalidArg);
    }
    Ok(a.mul(b).add(c))
}

/// Fused subtract-multiply: (a - b) * c. The first two arguments must be
/// non-negative.
pub fn sub_mul(a: &BigNum, b: &BigNum, c: &BigNum) -> Result<BigNum, BnError> {
    if a.is_negative() || b.is_negative() {
        return Err(BnError::InvalidArg);
    }
    Ok(a.sub(b).mul(c))
}

/// Square a value (see [`BigNum::sqr`] for the specialized path).
pub fn square(x: &BigNum) -> BigNum {
    x.sqr()
}

/// Raise to a small power by binary exponentiation.
pub fn power(base: &BigNum, exp: u32) -> BigNum {
    let mut acc = BigNum::one();
    let mut sq = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc.mul(&sq);
        }
        e >>= 1;
        if e > 0 {
            sq = sq.sqr();
        }
    }
    acc
}

/// Modular exponentiation: base^exp mod modulus.
///
/// Odd moduli go through the Montgomery kernel; even moduli fall back to
/// Barrett square-and-multiply. The exponent must be non-negative.
pub fn power_mod(base: &BigNum, exp: &BigNum, modulus: &BigNum) -> Result<BigNum, BnError> {
    if modulus.is_zero() || modulus.is_negative() {
        return Err(BnError::NonPositiveModulus);
    }
    if exp.is_negative() {
        return Err(BnError::InvalidArg);
    }
    if modulus.is_one() {
        return Ok(BigNum::zero());
    }

    if modulus.is_odd() {
        let ctx = MontgomeryCtx::new(modulus)?;
        return ctx.mont_exp(base, exp);
    }

    let ctx = BarrettCtx::new(modulus)?;
    let base = ctx.reduce(base)?;
    let mut acc = BigNum::one();
    for i in (0..exp.bit_len()).rev() {
        acc = ctx.square(&acc)?;
        if exp.get_bit(i) == 1 {
            acc = ctx.multiply(&acc, &base)?;
        }
    }
    Ok(acc)
}
