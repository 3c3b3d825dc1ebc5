//! Barrett reduction for a fixed modulus.

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::limb::LIMB_BITS;

/// Fixed-modulus Barrett reducer.
///
/// Precomputes mu = floor(b^2k / m) for a k-limb modulus m, so repeated
/// reductions of values below m^2 cost two multiplies and at most two
/// corrective subtractions instead of a full division. Read-only after
/// construction; `reduce`, `multiply` and `square` may be called freely
/// from shared references.
pub struct BarrettCtx {
    modulus: BigNum,
    /// m^2, the largest input the Barrett estimate is valid for.
    modulus_sq: BigNum,
    /// floor(b^2k / m).
    mu: BigNum,
    mod_limbs: usize,
}

impl BarrettCtx {
    /// Create a reducer for a positive modulus.
    pub fn new(modulus: &BigNum) -> Result<Self, BnError> {
        if modulus.is_zero() || modulus.is_negative() {
            return Err(BnError::NonPositiveModulus);
        }

        let mod_limbs = modulus.sig_limbs();
        let modulus_sq = modulus.sqr();
        let (mu, _) =
            BigNum::power_of_two(2 * LIMB_BITS * mod_limbs).div_rem_positive(modulus)?;

        Ok(BarrettCtx {
            modulus: modulus.clone(),
            modulus_sq,
            mu,
            mod_limbs,
        })
    }

    /// Return a reference to the modulus.
    pub fn modulus(&self) -> &BigNum {
        &self.modulus
    }

    /// Reduce `x` into `[0, m)`.
    pub fn reduce(&self, x: &BigNum) -> Result<BigNum, BnError> {
        if x.cmp_abs(&self.modulus) == std::cmp::Ordering::Less {
            if x.is_negative() {
                return Ok(x.add(&self.modulus));
            }
            return Ok(x.clone());
        }

        // The quotient estimate is only valid below m^2; larger inputs take
        // the ordinary division path.
        if x.cmp_abs(&self.modulus_sq) != std::cmp::Ordering::Less {
            return x.mod_reduce(&self.modulus);
        }

        let k = self.mod_limbs;

        let t1 = x
            .abs()
            .shr(LIMB_BITS * (k - 1))
            .mul(&self.mu)
            .shr(LIMB_BITS * (k + 1));
        let mut t1 = t1.mul(&self.modulus);
        t1.mask_bits(LIMB_BITS * (k + 1));

        let mut t2 = x.abs();
        t2.mask_bits(LIMB_BITS * (k + 1));

        let mut r = t2.sub(&t1);
        if r.is_negative() {
            r = r.add(&BigNum::power_of_two(LIMB_BITS * (k + 1)));
        }

        // Barrett error bound: at most two subtractions remain.
        while r.cmp_abs(&self.modulus) != std::cmp::Ordering::Less {
            r = r.sub(&self.modulus);
        }

        if x.is_negative() && !r.is_zero() {
            r = self.modulus.sub(&r);
        }
        Ok(r)
    }

    /// Modular multiply: `(a * b) mod m`.
    pub fn multiply(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, BnError> {
        self.reduce(&a.mul(b))
    }

    /// Modular square: `a^2 mod m`.
    pub fn square(&self, a: &BigNum) -> Result<BigNum, BnError> {
        self.reduce(&a.sqr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bn(s: &str) -> BigNum {
        BigNum::from_dec_string(s).unwrap()
    }

    #[test]
    fn test_rejects_bad_modulus() {
        assert!(BarrettCtx::new(&BigNum::zero()).is_err());
        assert!(BarrettCtx::new(&bn("-7")).is_err());
    }

    #[test]
    fn test_reduce_small_inputs() {
        let ctx = BarrettCtx::new(&bn("97")).unwrap();
        assert_eq!(ctx.reduce(&bn("42")).unwrap(), bn("42"));
        assert_eq!(ctx.reduce(&bn("-1")).unwrap(), bn("96"));
        assert!(ctx.reduce(&BigNum::zero()).unwrap().is_zero());
    }

    #[test]
    fn test_matches_plain_division() {
        // odd and even moduli, operands spanning the Barrett and fallback paths
        let moduli = [
            bn("97"),
            bn("1000000006"),
            bn("18446744073709551629"),
            bn("340282366920938463463374607431768211507"),
        ];
        let values = [
            bn("12345678901234567890"),
            bn("340282366920938463463374607431768211455"),
            bn("115792089237316195423570985008687907853269984665640564039457584007913129639935"),
            bn("-99999999999999999999999999"),
        ];
        for m in &moduli {
            let ctx = BarrettCtx::new(m).unwrap();
            for v in &values {
                assert_eq!(
                    ctx.reduce(v).unwrap(),
                    v.mod_reduce(m).unwrap(),
                    "reduce mismatch for {v} mod {m}"
                );
            }
        }
    }

    #[test]
    fn test_multiply_square_consistent() {
        let m = bn("170141183460469231731687303715884105727");
        let ctx = BarrettCtx::new(&m).unwrap();
        let a = bn("123456789123456789123456789123456789");
        let b = bn("98765432198765432198765432198765432");
        assert_eq!(
            ctx.multiply(&a, &b).unwrap(),
            a.mul(&b).mod_reduce(&m).unwrap()
        );
        assert_eq!(ctx.square(&a).unwrap(), a.sqr().mod_reduce(&m).unwrap());
        assert_eq!(ctx.square(&a).unwrap(), ctx.multiply(&a, &a).unwrap());
    }
}
