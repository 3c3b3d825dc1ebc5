//! Basic arithmetic: add, sub, mul, sqr, shifts, single-word helpers.

use crate::bignum::{BigNum, Sign};
use crate::limb::{
    word8_add3, word8_madd3, word8_sub3, word_add, word_madd3, word_sub, DoubleLimb, Limb,
    LIMB_BITS,
};

impl BigNum {
    /// Add: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        if self.is_negative() == other.is_negative() {
            let mut result = add_unsigned(self.limbs(), other.limbs());
            result.set_sign(self.sign());
            result
        } else if self.is_negative() {
            // (-a) + b = b - a
            sub_unsigned(other.limbs(), self.limbs())
        } else {
            // a + (-b) = a - b
            sub_unsigned(self.limbs(), other.limbs())
        }
    }

    /// Subtract: self - other.
    pub fn sub(&self, other: &BigNum) -> BigNum {
        if self.is_negative() != other.is_negative() {
            let mut result = add_unsigned(self.limbs(), other.limbs());
            result.set_sign(self.sign());
            result
        } else if self.is_negative() {
            // (-a) - (-b) = b - a
            sub_unsigned(other.limbs(), self.limbs())
        } else {
            sub_unsigned(self.limbs(), other.limbs())
        }
    }

    /// Multiply: self * other.
    pub fn mul(&self, other: &BigNum) -> BigNum {
        let mut result = mul_unsigned(self.limbs(), other.limbs());
        if self.is_negative() != other.is_negative() {
            result.set_sign(Sign::Negative);
        }
        result
    }

    /// Square: self * self, in roughly half the multiply-adds of `mul`.
    ///
    /// Cross terms are computed once and doubled, then the limb squares are
    /// added along the diagonal.
    pub fn sqr(&self) -> BigNum {
        let n = self.sig_limbs();
        if n == 0 {
            return BigNum::zero();
        }
        let x = &self.limbs()[..n];
        let mut z = vec![0u64; 2 * n + 1];

        // cross terms x[i]*x[j] for i < j
        for i in 0..n.saturating_sub(1) {
            let mut carry = 0;
            for j in (i + 1)..n {
                z[i + j] = word_madd3(x[i], x[j], z[i + j], &mut carry);
            }
            z[i + n] = carry;
        }

        // double them
        let mut spill = 0;
        for limb in z.iter_mut() {
            let top = *limb >> (LIMB_BITS - 1);
            *limb = (*limb << 1) | spill;
            spill = top;
        }

        // add the diagonal
        let mut carry = 0;
        for i in 0..n {
            let sq = (x[i] as DoubleLimb) * (x[i] as DoubleLimb);
            z[2 * i] = word_add(z[2 * i], sq as Limb, &mut carry);
            z[2 * i + 1] = word_add(z[2 * i + 1], (sq >> LIMB_BITS) as Limb, &mut carry);
        }
        z[2 * n] = z[2 * n].wrapping_add(carry);

        BigNum::from_limbs(z)
    }

    /// Left shift by `shift` bits.
    pub fn shl(&self, shift: usize) -> BigNum {
        if self.is_zero() {
            return BigNum::zero();
        }
        let word_shift = shift / LIMB_BITS;
        let bit_shift = shift % LIMB_BITS;
        let n = self.sig_limbs();

        let mut limbs = vec![0u64; n + word_shift + 1];
        limbs[word_shift..word_shift + n].copy_from_slice(&self.limbs()[..n]);

        if bit_shift != 0 {
            let mut carry = 0;
            for limb in limbs[word_shift..].iter_mut() {
                let w = *limb;
                *limb = (w << bit_shift) | carry;
                carry = w >> (LIMB_BITS - bit_shift);
            }
        }

        let mut result = BigNum::from_limbs(limbs);
        result.set_sign(self.sign());
        result
    }

    /// Right shift by `shift` bits (magnitude shift, sign preserved).
    pub fn shr(&self, shift: usize) -> BigNum {
        let word_shift = shift / LIMB_BITS;
        let bit_shift = shift % LIMB_BITS;
        let n = self.sig_limbs();
        if word_shift >= n {
            return BigNum::zero();
        }

        let mut limbs = self.limbs()[word_shift..n].to_vec();
        if bit_shift != 0 {
            let mut carry = 0;
            for limb in limbs.iter_mut().rev() {
                let w = *limb;
                *limb = (w >> bit_shift) | carry;
                carry = w << (LIMB_BITS - bit_shift);
            }
        }

        let mut result = BigNum::from_limbs(limbs);
        result.set_sign(self.sign());
        result
    }

    /// Multiply the magnitude by a single word, keeping the sign.
    pub fn mul_word(&self, w: Limb) -> BigNum {
        let n = self.sig_limbs();
        if n == 0 || w == 0 {
            return BigNum::zero();
        }
        let mut limbs = vec![0u64; n + 1];
        let mut carry = 0;
        for i in 0..n {
            limbs[i] = word_madd3(self.limb_at(i), w, 0, &mut carry);
        }
        limbs[n] = carry;
        let mut result = BigNum::from_limbs(limbs);
        result.set_sign(self.sign());
        result
    }

    /// Add a single word to a non-negative value.
    pub fn add_word(&self, w: Limb) -> BigNum {
        debug_assert!(!self.is_negative());
        self.add(&BigNum::from_u64(w))
    }

    /// Subtract a single word from a value.
    pub fn sub_word(&self, w: Limb) -> BigNum {
        self.sub(&BigNum::from_u64(w))
    }

    /// Divide the magnitude by a single nonzero word, returning quotient and
    /// remainder. The quotient keeps the sign of self.
    pub fn div_rem_word(&self, w: Limb) -> (BigNum, Limb) {
        debug_assert!(w != 0);
        let n = self.sig_limbs();
        let mut q = vec![0u64; n];
        let mut rem: Limb = 0;
        for i in (0..n).rev() {
            let cur = ((rem as DoubleLimb) << LIMB_BITS) | self.limb_at(i) as DoubleLimb;
            q[i] = (cur / w as DoubleLimb) as Limb;
            rem = (cur % w as DoubleLimb) as Limb;
        }
        let mut quotient = BigNum::from_limbs(q);
        quotient.set_sign(self.sign());
        (quotient, rem)
    }

    /// Magnitude modulo a single nonzero word.
    pub fn mod_word(&self, w: Limb) -> Limb {
        debug_assert!(w != 0);
        let mut rem: Limb = 0;
        for i in (0..self.sig_limbs()).rev() {
            let cur = ((rem as DoubleLimb) << LIMB_BITS) | self.limb_at(i) as DoubleLimb;
            rem = (cur % w as DoubleLimb) as Limb;
        }
        rem
    }
}

/// Add two unsigned limb arrays, 8-limb blocks first.
pub(crate) fn add_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut z = vec![0u64; long.len() + 1];

    let blocks = short.len() - (short.len() % 8);
    let mut carry = 0;
    for j in (0..blocks).step_by(8) {
        carry = word8_add3(&mut z[j..j + 8], &long[j..j + 8], &short[j..j + 8], carry);
    }
    for j in blocks..short.len() {
        z[j] = word_add(long[j], short[j], &mut carry);
    }
    for j in short.len()..long.len() {
        z[j] = word_add(long[j], 0, &mut carry);
    }
    z[long.len()] = carry;

    BigNum::from_limbs(z)
}

/// Subtract unsigned limb arrays as signed magnitudes: the smaller comes off
/// the larger, and the sign follows the larger operand.
pub(crate) fn sub_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let mut cmp = std::cmp::Ordering::Equal;
    for i in (0..a.len().max(b.len())).rev() {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        if av != bv {
            cmp = av.cmp(&bv);
            break;
        }
    }

    let (larger, smaller, negative) = match cmp {
        std::cmp::Ordering::Less => (b, a, true),
        std::cmp::Ordering::Equal => return BigNum::zero(),
        std::cmp::Ordering::Greater => (a, b, false),
    };

    let mut z = vec![0u64; larger.len()];
    let blocks = smaller.len() - (smaller.len() % 8);
    let mut borrow = 0;
    for j in (0..blocks).step_by(8) {
        borrow = word8_sub3(
            &mut z[j..j + 8],
            &larger[j..j + 8],
            &smaller[j..j + 8],
            borrow,
        );
    }
    for j in blocks..smaller.len() {
        z[j] = word_sub(larger[j], smaller[j], &mut borrow);
    }
    for j in smaller.len()..larger.len() {
        z[j] = word_sub(larger[j], 0, &mut borrow);
    }
    debug_assert_eq!(borrow, 0);

    let mut result = BigNum::from_limbs(z);
    if negative {
        result.set_sign(Sign::Negative);
    }
    result
}

/// Schoolbook multiply into a sum-of-lengths buffer with one guard limb.
pub(crate) fn mul_unsigned(a: &[Limb], b: &[Limb]) -> BigNum {
    let a_sig = a.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1);
    let b_sig = b.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1);
    if a_sig == 0 || b_sig == 0 {
        return BigNum::zero();
    }
    let (a, b) = (&a[..a_sig], &b[..b_sig]);

    let mut z = vec![0u64; a_sig + b_sig + 1];
    let blocks = b_sig - (b_sig % 8);

    for (i, &a_i) in a.iter().enumerate() {
        let mut carry = 0;
        for k in (0..blocks).step_by(8) {
            carry = word8_madd3(&mut z[i + k..i + k + 8], &b[k..k + 8], a_i, carry);
        }
        for k in blocks..b_sig {
            z[i + k] = word_madd3(a_i, b[k], z[i + k], &mut carry);
        }
        z[i + b_sig] = carry;
    }

    BigNum::from_limbs(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let a = BigNum::from_u64(100);
        let b = BigNum::from_u64(200);
        assert_eq!(a.add(&b), BigNum::from_u64(300));
    }

    #[test]
    fn test_add_carry_across_limbs() {
        let a = BigNum::from_limbs(vec![Limb::MAX, Limb::MAX, Limb::MAX]);
        let one = BigNum::one();
        assert_eq!(a.add(&one), BigNum::power_of_two(192));
    }

    #[test]
    fn test_signed_add_sub_dispatch() {
        let a = BigNum::from_dec_string("100").unwrap();
        let b = BigNum::from_dec_string("-30").unwrap();
        assert_eq!(a.add(&b).to_dec_string(), "70");
        assert_eq!(b.add(&a).to_dec_string(), "70");
        assert_eq!(a.sub(&b).to_dec_string(), "130");
        assert_eq!(b.sub(&a).to_dec_string(), "-130");
        let c = BigNum::from_dec_string("-200").unwrap();
        assert_eq!(a.add(&c).to_dec_string(), "-100");
        assert_eq!(c.sub(&b).to_dec_string(), "-170");
    }

    #[test]
    fn test_sub_to_zero() {
        let a = BigNum::from_u64(42);
        let r = a.sub(&a);
        assert!(r.is_zero());
        assert!(!r.is_negative());
    }

    #[test]
    fn test_mul() {
        let a = BigNum::from_u64(12345);
        let b = BigNum::from_u64(67890);
        assert_eq!(a.mul(&b), BigNum::from_u64(12345u64 * 67890));
    }

    #[test]
    fn test_mul_multi_limb() {
        // (2^64 - 1)^2 = 2^128 - 2^65 + 1
        let a = BigNum::from_u64(Limb::MAX);
        let expected = BigNum::power_of_two(128)
            .sub(&BigNum::power_of_two(65))
            .add(&BigNum::one());
        assert_eq!(a.mul(&a), expected);
    }

    #[test]
    fn test_mul_sign() {
        let a = BigNum::from_dec_string("-7").unwrap();
        let b = BigNum::from_u64(6);
        assert_eq!(a.mul(&b).to_dec_string(), "-42");
        assert_eq!(a.mul(&a).to_dec_string(), "49");
    }

    #[test]
    fn test_sqr_matches_mul() {
        let vals = [
            BigNum::from_u64(0),
            BigNum::from_u64(0xDEAD_BEEF),
            BigNum::from_u64(Limb::MAX),
            BigNum::from_dec_string("123456789012345678901234567890123456789").unwrap(),
            BigNum::from_limbs(vec![Limb::MAX; 9]),
        ];
        for v in &vals {
            assert_eq!(v.sqr(), v.mul(v));
        }
    }

    #[test]
    fn test_shift_left_scenario() {
        // 255 << 4 == 4080
        assert_eq!(BigNum::from_u64(255).shl(4), BigNum::from_u64(4080));
    }

    #[test]
    fn test_shift_roundtrip() {
        let n = BigNum::from_dec_string("987654321987654321987654321").unwrap();
        for shift in [1, 17, 64, 65, 128, 300] {
            assert_eq!(n.shl(shift).shr(shift), n, "shift {shift}");
        }
        assert!(n.shr(n.bit_len()).is_zero());
    }

    #[test]
    fn test_shift_spill_across_limbs() {
        let n = BigNum::from_u64(Limb::MAX);
        let shifted = n.shl(1);
        assert_eq!(shifted.limb_at(0), Limb::MAX - 1);
        assert_eq!(shifted.limb_at(1), 1);
    }

    #[test]
    fn test_word_helpers() {
        let n = BigNum::from_dec_string("123456789012345678901").unwrap();
        let (q, r) = n.div_rem_word(1_000_000_007);
        assert_eq!(
            q.mul_word(1_000_000_007).add_word(r),
            n,
            "div_rem_word identity"
        );
        assert_eq!(n.mod_word(1_000_000_007), r);
        assert_eq!(BigNum::from_u64(100).mod_word(7), 2);
    }

    #[test]
    fn test_block_kernels_on_long_operands() {
        // 20 limbs exercises both the 8-limb blocks and the scalar tails
        let a = BigNum::from_limbs((1..=20).map(|i| i as Limb * 0x0123_4567_89AB_CDEF).collect());
        let b = BigNum::from_limbs((1..=11).map(|i| Limb::MAX - i as Limb).collect());
        let sum = a.add(&b);
        assert_eq!(sum.sub(&b), a);
        assert_eq!(sum.sub(&a), b);
        let prod = a.mul(&b);
        let (q, r) = prod.div_rem_positive(&b).unwrap();
        assert_eq!(q, a);
        assert!(r.is_zero());
    }
}
