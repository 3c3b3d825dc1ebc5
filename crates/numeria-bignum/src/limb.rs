//! Lowest-level word arithmetic.
//!
//! Every multi-limb loop in this crate bottoms out in these primitives.
//! A limb is 64 bits; products are carried in 128-bit intermediates, so
//! `a*b + c + d` can never overflow: (2^64-1)^2 + 2*(2^64-1) < 2^128.
//! Carry and borrow values are always 0 or 1.

/// Limb type for big number representation (64-bit on 64-bit platforms).
pub type Limb = u64;
/// Double-width type for multiplication intermediates.
pub type DoubleLimb = u128;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// High bit of a limb.
pub const LIMB_TOP_BIT: Limb = 1 << (LIMB_BITS - 1);

/// Add with carry: returns `x + y + carry`, leaving the carry-out in `carry`.
#[inline]
pub fn word_add(x: Limb, y: Limb, carry: &mut Limb) -> Limb {
    let z = x.wrapping_add(y);
    let c1 = (z < x) as Limb;
    let z = z.wrapping_add(*carry);
    *carry = c1 | (z < *carry) as Limb;
    z
}

/// Subtract with borrow: returns `x - y - borrow`, leaving the borrow-out in `borrow`.
#[inline]
pub fn word_sub(x: Limb, y: Limb, borrow: &mut Limb) -> Limb {
    let t = x.wrapping_sub(y);
    let b1 = (t > x) as Limb;
    let z = t.wrapping_sub(*borrow);
    *borrow = b1 | (z > t) as Limb;
    z
}

/// Multiply-add: returns the low half of `a*b + carry`, leaving the high half in `carry`.
#[inline]
pub fn word_madd2(a: Limb, b: Limb, carry: &mut Limb) -> Limb {
    let t = (a as DoubleLimb) * (b as DoubleLimb) + (*carry as DoubleLimb);
    *carry = (t >> LIMB_BITS) as Limb;
    t as Limb
}

/// Multiply-add: returns the low half of `a*b + c + carry`, leaving the high half in `carry`.
#[inline]
pub fn word_madd3(a: Limb, b: Limb, c: Limb, carry: &mut Limb) -> Limb {
    let t = (a as DoubleLimb) * (b as DoubleLimb) + (c as DoubleLimb) + (*carry as DoubleLimb);
    *carry = (t >> LIMB_BITS) as Limb;
    t as Limb
}

/// Eight-limb block addition: `z[0..8] = x[0..8] + y[0..8]`.
#[inline]
pub fn word8_add3(z: &mut [Limb], x: &[Limb], y: &[Limb], mut carry: Limb) -> Limb {
    z[0] = word_add(x[0], y[0], &mut carry);
    z[1] = word_add(x[1], y[1], &mut carry);
    z[2] = word_add(x[2], y[2], &mut carry);
    z[3] = word_add(x[3], y[3], &mut carry);
    z[4] = word_add(x[4], y[4], &mut carry);
    z[5] = word_add(x[5], y[5], &mut carry);
    z[6] = word_add(x[6], y[6], &mut carry);
    z[7] = word_add(x[7], y[7], &mut carry);
    carry
}

/// Eight-limb block subtraction: `z[0..8] = x[0..8] - y[0..8]`.
#[inline]
pub fn word8_sub3(z: &mut [Limb], x: &[Limb], y: &[Limb], mut borrow: Limb) -> Limb {
    z[0] = word_sub(x[0], y[0], &mut borrow);
    z[1] = word_sub(x[1], y[1], &mut borrow);
    z[2] = word_sub(x[2], y[2], &mut borrow);
    z[3] = word_sub(x[3], y[3], &mut borrow);
    z[4] = word_sub(x[4], y[4], &mut borrow);
    z[5] = word_sub(x[5], y[5], &mut borrow);
    z[6] = word_sub(x[6], y[6], &mut borrow);
    z[7] = word_sub(x[7], y[7], &mut borrow);
    borrow
}

/// Eight-limb block linear multiply: `z[0..8] = x[0..8] * y`.
#[inline]
pub fn word8_linmul3(z: &mut [Limb], x: &[Limb], y: Limb, mut carry: Limb) -> Limb {
    z[0] = word_madd2(x[0], y, &mut carry);
    z[1] = word_madd2(x[1], y, &mut carry);
    z[2] = word_madd2(x[2], y, &mut carry);
    z[3] = word_madd2(x[3], y, &mut carry);
    z[4] = word_madd2(x[4], y, &mut carry);
    z[5] = word_madd2(x[5], y, &mut carry);
    z[6] = word_madd2(x[6], y, &mut carry);
    z[7] = word_madd2(x[7], y, &mut carry);
    carry
}

/// Eight-limb block multiply-accumulate: `z[0..8] += x[0..8] * y`.
#[inline]
pub fn word8_madd3(z: &mut [Limb], x: &[Limb], y: Limb, mut carry: Limb) -> Limb {
    z[0] = word_madd3(x[0], y, z[0], &mut carry);
    z[1] = word_madd3(x[1], y, z[1], &mut carry);
    z[2] = word_madd3(x[2], y, z[2], &mut carry);
    z[3] = word_madd3(x[3], y, z[3], &mut carry);
    z[4] = word_madd3(x[4], y, z[4], &mut carry);
    z[5] = word_madd3(x[5], y, z[5], &mut carry);
    z[6] = word_madd3(x[6], y, z[6], &mut carry);
    z[7] = word_madd3(x[7], y, z[7], &mut carry);
    carry
}

/// Trial-digit divide: `(hi, lo) / d`, where the quotient is known to fit a limb.
///
/// Used for division digit estimation; `hi < d` must hold.
#[inline]
pub fn word_div2(hi: Limb, lo: Limb, d: Limb) -> Limb {
    debug_assert!(hi < d);
    let n = ((hi as DoubleLimb) << LIMB_BITS) | (lo as DoubleLimb);
    (n / d as DoubleLimb) as Limb
}

/// Test whether a trial quotient digit is too large.
///
/// Returns true when `q * (y2, y1)` exceeds the three-limb value `(x3, x2, x1)`,
/// meaning the digit must be decremented.
#[inline]
pub fn div_estimate_too_large(q: Limb, y2: Limb, y1: Limb, x3: Limb, x2: Limb, x1: Limb) -> bool {
    let hi = (q as DoubleLimb) * (y2 as DoubleLimb);
    let lo = (q as DoubleLimb) * (y1 as DoubleLimb);

    let mut h = (hi >> LIMB_BITS) as Limb;
    let mut m = hi as Limb;
    let (m2, c) = m.overflowing_add((lo >> LIMB_BITS) as Limb);
    m = m2;
    h += c as Limb;
    let l = lo as Limb;

    (h, m, l) > (x3, x2, x1)
}
