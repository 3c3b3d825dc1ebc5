//! Big number type and basic accessors.

use numeria_types::BnError;
use zeroize::Zeroize;

use crate::limb::{Limb, LIMB_BITS};

/// Sign of a [`BigNum`]. Zero is always `Positive`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn flipped(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// A heap-allocated sign-magnitude big number, zeroized on drop.
///
/// The magnitude is a little-endian array of `u64` limbs (`limbs[0]` is the
/// least significant). Arithmetic operates on the significant limb count;
/// `normalize` strips high zero limbs after every mutation.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct BigNum {
    limbs: Vec<Limb>,
    #[zeroize(skip)]
    sign: Sign,
}

impl BigNum {
    /// Create a zero-valued BigNum.
    pub fn zero() -> Self {
        Self {
            limbs: vec![0],
            sign: Sign::Positive,
        }
    }

    /// Create a BigNum with value 1.
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Create a BigNum from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        Self {
            limbs: vec![value],
            sign: Sign::Positive,
        }
    }

    /// Create a BigNum from a vector of little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        let mut bn = Self {
            limbs: if limbs.is_empty() { vec![0] } else { limbs },
            sign: Sign::Positive,
        };
        bn.normalize();
        bn
    }

    /// Create 2^n.
    pub fn power_of_two(n: usize) -> Self {
        let mut bn = Self::zero();
        bn.set_bit(n);
        bn
    }

    /// Create a BigNum from big-endian bytes (unsigned magnitude).
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }

        let num_limbs = bytes.len().div_ceil(8);
        let mut limbs = vec![0u64; num_limbs];

        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }

        let mut bn = Self {
            limbs,
            sign: Sign::Positive,
        };
        bn.normalize();
        bn
    }

    /// Export the magnitude to minimal-length big-endian bytes.
    ///
    /// Zero encodes as a single zero byte.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let bits = self.bit_len();
        if bits == 0 {
            return vec![0];
        }

        let num_bytes = bits.div_ceil(8);
        let mut bytes = vec![0u8; num_bytes];
        for i in 0..num_bytes {
            bytes[num_bytes - 1 - i] = (self.limbs[i / 8] >> ((i % 8) * 8)) as u8;
        }
        bytes
    }

    /// Export the magnitude to exactly `len` big-endian bytes, zero-padded on
    /// the left. Fails when the value needs more than `len` bytes.
    pub fn to_bytes_be_fixed(&self, len: usize) -> Result<Vec<u8>, BnError> {
        let min = self.bit_len().div_ceil(8);
        if min > len {
            return Err(BnError::BufferTooSmall {
                need: min,
                got: len,
            });
        }
        let mut out = vec![0u8; len];
        let bytes = self.to_bytes_be();
        if !self.is_zero() {
            out[len - bytes.len()..].copy_from_slice(&bytes);
        }
        Ok(out)
    }

    /// Parse a decimal string, with an optional leading `-`.
    pub fn from_dec_string(s: &str) -> Result<Self, BnError> {
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest),
            None => (Sign::Positive, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BnError::BadDecimalString);
        }

        // Accumulate 19 digits (one u64 chunk) at a time.
        let mut result = BigNum::zero();
        let bytes = digits.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            let take = (bytes.len() - pos).min(19);
            let mut chunk: u64 = 0;
            for &b in &bytes[pos..pos + take] {
                chunk = chunk * 10 + (b - b'0') as u64;
            }
            result = result.mul_word(10u64.pow(take as u32)).add_word(chunk);
            pos += take;
        }
        result.set_sign(sign);
        result.normalize();
        Ok(result)
    }

    /// Render as a decimal string, with a leading `-` when negative.
    pub fn to_dec_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut chunks: Vec<u64> = Vec::new();
        let mut cur = self.abs();
        while !cur.is_zero() {
            let (q, r) = cur.div_rem_word(10u64.pow(19));
            chunks.push(r);
            cur = q;
        }

        let mut s = String::new();
        if self.is_negative() {
            s.push('-');
        }
        s.push_str(&chunks[chunks.len() - 1].to_string());
        for chunk in chunks.iter().rev().skip(1) {
            s.push_str(&format!("{chunk:019}"));
        }
        s
    }

    /// Return the number of significant bits.
    pub fn bit_len(&self) -> usize {
        for i in (0..self.limbs.len()).rev() {
            if self.limbs[i] != 0 {
                return i * LIMB_BITS + (LIMB_BITS - self.limbs[i].leading_zeros() as usize);
            }
        }
        0
    }

    /// Return the significant limb count (high zero limbs excluded).
    pub fn sig_limbs(&self) -> usize {
        for i in (0..self.limbs.len()).rev() {
            if self.limbs[i] != 0 {
                return i + 1;
            }
        }
        0
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    /// Return true if this number equals 1.
    pub fn is_one(&self) -> bool {
        self.sign == Sign::Positive && self.sig_limbs() == 1 && self.limbs[0] == 1
    }

    /// Return true if this number is negative (zero is never negative).
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative && !self.is_zero()
    }

    /// Return true if this number is even.
    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    /// Return true if this number is odd.
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Return the sign.
    pub fn sign(&self) -> Sign {
        if self.is_zero() {
            Sign::Positive
        } else {
            self.sign
        }
    }

    /// Set the sign. A zero value stays positive.
    pub fn set_sign(&mut self, sign: Sign) {
        self.sign = if self.is_zero() { Sign::Positive } else { sign };
    }

    /// Negate in place.
    pub fn flip_sign(&mut self) {
        self.set_sign(self.sign.flipped());
    }

    /// Return the absolute value.
    pub fn abs(&self) -> BigNum {
        let mut r = self.clone();
        r.set_sign(Sign::Positive);
        r
    }

    /// Return limb `idx`, or 0 beyond the working length.
    pub fn limb_at(&self, idx: usize) -> Limb {
        self.limbs.get(idx).copied().unwrap_or(0)
    }

    /// Return the limbs as a slice.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    pub(crate) fn limbs_mut(&mut self) -> &mut Vec<Limb> {
        &mut self.limbs
    }

    /// Get bit at position `idx` (0-indexed from LSB).
    pub fn get_bit(&self, idx: usize) -> u64 {
        let limb_idx = idx / LIMB_BITS;
        if limb_idx >= self.limbs.len() {
            0
        } else {
            (self.limbs[limb_idx] >> (idx % LIMB_BITS)) & 1
        }
    }

    /// Set bit at position `idx` (0-indexed from LSB).
    pub fn set_bit(&mut self, idx: usize) {
        let limb_idx = idx / LIMB_BITS;
        if limb_idx >= self.limbs.len() {
            self.limbs.resize(limb_idx + 1, 0);
        }
        self.limbs[limb_idx] |= 1u64 << (idx % LIMB_BITS);
    }

    /// Keep only the low `n` bits, clearing everything above.
    pub fn mask_bits(&mut self, n: usize) {
        let keep_limbs = n / LIMB_BITS;
        let keep_bits = n % LIMB_BITS;
        if keep_limbs >= self.limbs.len() {
            return;
        }
        if keep_bits == 0 {
            self.limbs.truncate(keep_limbs.max(1));
            if keep_limbs == 0 {
                self.limbs[0] = 0;
            }
        } else {
            self.limbs.truncate(keep_limbs + 1);
            self.limbs[keep_limbs] &= (1u64 << keep_bits) - 1;
        }
        self.normalize();
    }

    /// Count trailing zero bits. Zero reports 0.
    pub fn low_zero_bits(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        for (i, &limb) in self.limbs.iter().enumerate() {
            if limb != 0 {
                return i * LIMB_BITS + limb.trailing_zeros() as usize;
            }
        }
        0
    }

    /// Remove leading zero limbs; force zero positive.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && *self.limbs.last().unwrap() == 0 {
            self.limbs.pop();
        }
        if self.is_zero() {
            self.sign = Sign::Positive;
        }
    }

    /// Compare absolute values.
    pub fn cmp_abs(&self, other: &BigNum) -> std::cmp::Ordering {
        let a_bits = self.bit_len();
        let b_bits = other.bit_len();
        if a_bits != b_bits {
            return a_bits.cmp(&b_bits);
        }
        for i in (0..self.limbs.len().max(other.limbs.len())).rev() {
            let a = self.limb_at(i);
            let b = other.limb_at(i);
            if a != b {
                return a.cmp(&b);
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl std::fmt::Debug for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let hex = self
            .to_bytes_be()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>();
        write!(f, "BigNum({sign}0x{hex})")
    }
}

impl std::fmt::Display for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_dec_string())
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.is_negative() == other.is_negative()
            && self.cmp_abs(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for BigNum {}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.cmp_abs(other),
            (true, true) => other.cmp_abs(self),
        }
    }
}
