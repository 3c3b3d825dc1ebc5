//! Long division producing quotient and remainder.

use numeria_types::BnError;

use crate::bignum::{BigNum, Sign};
use crate::limb::{div_estimate_too_large, word_div2, Limb, LIMB_BITS, LIMB_TOP_BIT};

impl BigNum {
    /// Division with remainder: returns `(q, r)` with `self == q * divisor + r`
    /// and `0 <= r < |divisor|`.
    ///
    /// The remainder is never negative; for a positive divisor this is floor
    /// division.
    pub fn div_rem(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), BnError> {
        let mut r = self.abs();
        let mut y = divisor.abs();
        let mut q = div_core(&mut r, &mut y)?;

        if self.is_negative() {
            q.flip_sign();
            if !r.is_zero() {
                q = q.sub(&BigNum::one());
                r = divisor.abs().sub(&r);
            }
        }
        if divisor.is_negative() {
            q.flip_sign();
        }
        Ok((q, r))
    }

    /// The unsigned division core: both operands must be non-negative.
    pub fn div_rem_positive(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), BnError> {
        if self.is_negative() || divisor.is_negative() {
            return Err(BnError::InvalidArg);
        }
        let mut r = self.clone();
        let mut y = divisor.clone();
        let q = div_core(&mut r, &mut y)?;
        Ok((q, r))
    }

    /// Modular reduction: `self mod modulus`, always in `[0, |modulus|)`.
    pub fn mod_reduce(&self, modulus: &BigNum) -> Result<BigNum, BnError> {
        let (_, r) = self.div_rem(modulus)?;
        Ok(r)
    }
}

/// Knuth long division. On return `x` holds the remainder and the quotient is
/// returned; `y` is used as scratch (normalized in place).
///
/// Both inputs must be non-negative.
fn div_core(x: &mut BigNum, y: &mut BigNum) -> Result<BigNum, BnError> {
    if y.is_zero() {
        return Err(BnError::DivisionByZero);
    }
    debug_assert!(!x.is_negative() && !y.is_negative());

    match x.cmp_abs(y) {
        std::cmp::Ordering::Less => return Ok(BigNum::zero()),
        std::cmp::Ordering::Equal => {
            *x = BigNum::zero();
            return Ok(BigNum::one());
        }
        std::cmp::Ordering::Greater => {}
    }

    // Normalize so the divisor's top limb has its high bit set; this keeps
    // the trial digits accurate to within two.
    let mut shifts = 0;
    while y.limb_at(y.sig_limbs() - 1) < LIMB_TOP_BIT {
        *x = x.shl(1);
        *y = y.shl(1);
        shifts += 1;
    }

    let n = x.sig_limbs() - 1;
    let t = y.sig_limbs() - 1;

    if n <= t {
        let mut q = BigNum::zero();
        while x.cmp_abs(y) != std::cmp::Ordering::Less {
            *x = x.sub(y);
            q = q.add(&BigNum::one());
        }
        *x = x.shr(shifts);
        return Ok(q);
    }

    let mut q_limbs = vec![0 as Limb; n - t + 1];

    let top = y.shl(LIMB_BITS * (n - t));
    while x.cmp_abs(&top) != std::cmp::Ordering::Less {
        *x = x.sub(&top);
        q_limbs[n - t] += 1;
    }

    for j in ((t + 1)..=n).rev() {
        let x_j0 = x.limb_at(j);
        let x_j1 = x.limb_at(j - 1);
        let y_t = y.limb_at(t);

        let mut digit = if x_j0 == y_t {
            Limb::MAX
        } else {
            word_div2(x_j0, x_j1, y_t)
        };

        let y_t1 = if t > 0 { y.limb_at(t - 1) } else { 0 };
        let x_j2 = if j >= 2 { x.limb_at(j - 2) } else { 0 };
        while div_estimate_too_large(digit, y_t, y_t1, x_j0, x_j1, x_j2) {
            digit -= 1;
        }

        *x = x.sub(&y.mul_word(digit).shl(LIMB_BITS * (j - t - 1)));
        if x.is_negative() {
            *x = x.add(&y.shl(LIMB_BITS * (j - t - 1)));
            digit -= 1;
        }
        q_limbs[j - t - 1] = digit;
    }

    *x = x.shr(shifts);
    Ok(BigNum::from_limbs(q_limbs))
}
