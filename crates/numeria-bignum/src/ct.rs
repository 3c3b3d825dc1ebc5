//! Constant-time selection helpers.
//!
//! Used by the reduction kernels so the final correction step does not
//! branch on secret-derived data. No broader hardening is attempted here.

use subtle::{Choice, ConstantTimeEq};

use crate::bignum::BigNum;
use crate::limb::{word_sub, Limb};

impl BigNum {
    /// Constant-time equality of sign and magnitude.
    pub fn ct_eq(&self, other: &BigNum) -> Choice {
        let max_len = self.limbs().len().max(other.limbs().len());
        let mut result: u8 = 1;

        result &= (self.is_negative() as u8)
            .ct_eq(&(other.is_negative() as u8))
            .unwrap_u8();
        for i in 0..max_len {
            result &= self.limb_at(i).ct_eq(&other.limb_at(i)).unwrap_u8();
        }
        Choice::from(result)
    }

    /// Constant-time select: `a` when choice is 0, `b` when choice is 1.
    pub fn ct_select(a: &BigNum, b: &BigNum, choice: Choice) -> BigNum {
        let mask = (choice.unwrap_u8() as Limb).wrapping_neg();
        let max_len = a.limbs().len().max(b.limbs().len());
        let mut limbs = vec![0 as Limb; max_len];

        for (i, limb) in limbs.iter_mut().enumerate() {
            let av = a.limb_at(i);
            *limb = av ^ (mask & (av ^ b.limb_at(i)));
        }

        let neg_a = a.is_negative() as Limb;
        let neg = neg_a ^ (mask & (neg_a ^ b.is_negative() as Limb));

        let mut result = BigNum::from_limbs(limbs);
        if neg != 0 {
            result.set_sign(crate::bignum::Sign::Negative);
        }
        result
    }

    /// If `self >= modulus`, return `self - modulus`, else `self`, selecting
    /// the result without a data-dependent branch. Both values must be
    /// non-negative.
    pub fn ct_sub_if_gte(&self, modulus: &BigNum) -> BigNum {
        let max_len = self.limbs().len().max(modulus.limbs().len());

        let mut diff = vec![0 as Limb; max_len];
        let mut borrow: Limb = 0;
        for (i, d) in diff.iter_mut().enumerate() {
            *d = word_sub(self.limb_at(i), modulus.limb_at(i), &mut borrow);
        }

        // borrow == 0 means self >= modulus
        let use_diff = Choice::from((borrow == 0) as u8);
        BigNum::ct_select(self, &BigNum::from_limbs(diff), use_diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ct_eq() {
        let a = BigNum::from_u64(42);
        let b = BigNum::from_u64(42);
        let c = BigNum::from_u64(43);
        assert_eq!(a.ct_eq(&b).unwrap_u8(), 1);
        assert_eq!(a.ct_eq(&c).unwrap_u8(), 0);
        let neg = BigNum::from_dec_string("-42").unwrap();
        assert_eq!(a.ct_eq(&neg).unwrap_u8(), 0);
    }

    #[test]
    fn test_ct_select() {
        let a = BigNum::from_u64(10);
        let b = BigNum::from_dec_string("-36893488147419103232").unwrap();
        assert_eq!(BigNum::ct_select(&a, &b, Choice::from(0)), a);
        assert_eq!(BigNum::ct_select(&a, &b, Choice::from(1)), b);
    }

    #[test]
    fn test_ct_sub_if_gte() {
        let modulus = BigNum::from_u64(97);
        assert_eq!(
            BigNum::from_u64(100).ct_sub_if_gte(&modulus),
            BigNum::from_u64(3)
        );
        assert_eq!(
            BigNum::from_u64(50).ct_sub_if_gte(&modulus),
            BigNum::from_u64(50)
        );
        assert!(BigNum::from_u64(97).ct_sub_if_gte(&modulus).is_zero());
    }

    #[test]
    fn test_ct_sub_if_gte_multi_limb() {
        let m = BigNum::power_of_two(192).sub(&BigNum::from_u64(237));
        let over = m.add(&BigNum::from_u64(5));
        assert_eq!(over.ct_sub_if_gte(&m), BigNum::from_u64(5));
        let under = m.sub(&BigNum::one());
        assert_eq!(under.ct_sub_if_gte(&m), under);
    }
}
