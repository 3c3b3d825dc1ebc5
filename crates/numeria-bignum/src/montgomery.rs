//! Montgomery reduction and modular exponentiation.

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::limb::{word8_madd3, word_madd3, Limb, LIMB_BITS};

/// Montgomery multiplication context for an odd modulus.
///
/// Works in the Montgomery form R = 2^(k * 64) for a k-limb modulus,
/// turning each modular multiplication into a multiply plus the REDC
/// limb sweep. Read-only after construction.
pub struct MontgomeryCtx {
    modulus: BigNum,
    mod_limbs: usize,
    /// n0' with modulus[0] * n0' == -1 (mod 2^64).
    n_prime: Limb,
    /// R^2 mod m, the factor that moves a value into Montgomery form.
    r_squared: BigNum,
}

impl MontgomeryCtx {
    /// Create a context for an odd positive modulus.
    pub fn new(modulus: &BigNum) -> Result<Self, BnError> {
        if modulus.is_zero() || modulus.is_negative() {
            return Err(BnError::NonPositiveModulus);
        }
        if modulus.is_even() {
            return Err(BnError::EvenModulus);
        }

        let mod_limbs = modulus.sig_limbs();
        let n_prime = neg_inv_mod_word(modulus.limb_at(0));
        let r_squared = BigNum::power_of_two(2 * mod_limbs * LIMB_BITS).mod_reduce(modulus)?;

        Ok(MontgomeryCtx {
            modulus: modulus.clone(),
            mod_limbs,
            n_prime,
            r_squared,
        })
    }

    /// Return a reference to the modulus.
    pub fn modulus(&self) -> &BigNum {
        &self.modulus
    }

    /// Move a value into Montgomery form: a*R mod m.
    pub fn to_mont(&self, a: &BigNum) -> Result<BigNum, BnError> {
        let reduced = a.mod_reduce(&self.modulus)?;
        Ok(self.redc(&reduced.mul(&self.r_squared)))
    }

    /// Move a value out of Montgomery form: a*R^-1 mod m.
    pub fn from_mont(&self, a_mont: &BigNum) -> BigNum {
        self.redc(a_mont)
    }

    /// Montgomery multiply of two values already in Montgomery form.
    pub fn mont_mul(&self, a: &BigNum, b: &BigNum) -> BigNum {
        self.redc(&a.mul(b))
    }

    /// Montgomery square of a value already in Montgomery form.
    pub fn mont_sqr(&self, a: &BigNum) -> BigNum {
        self.redc(&a.sqr())
    }

    /// REDC: given z < m*R, compute z * R^-1 mod m.
    ///
    /// For each of the low k limbs, absorb a multiple of the modulus chosen
    /// to zero that limb, carrying through the high half; the high k limbs
    /// then hold the result, one conditional subtraction away from [0, m).
    fn redc(&self, t: &BigNum) -> BigNum {
        let k = self.mod_limbs;
        let m = &self.modulus.limbs()[..k];

        let mut z = vec![0 as Limb; 2 * k + 1];
        let t_limbs = t.limbs();
        let copy = t_limbs.len().min(z.len());
        z[..copy].copy_from_slice(&t_limbs[..copy]);

        let blocks = k - (k % 8);
        for i in 0..k {
            let y = z[i].wrapping_mul(self.n_prime);

            let mut carry = 0;
            for j in (0..blocks).step_by(8) {
                carry = word8_madd3(&mut z[i + j..i + j + 8], &m[j..j + 8], y, carry);
            }
            for j in blocks..k {
                z[i + j] = word_madd3(y, m[j], z[i + j], &mut carry);
            }

            let mut idx = i + k;
            while carry != 0 && idx < z.len() {
                let (sum, overflow) = z[idx].overflowing_add(carry);
                z[idx] = sum;
                carry = overflow as Limb;
                idx += 1;
            }
        }

        let result = BigNum::from_limbs(z[k..].to_vec());
        result.ct_sub_if_gte(&self.modulus)
    }

    /// Windowed Montgomery exponentiation: base^exp mod m.
    pub fn mont_exp(&self, base: &BigNum, exp: &BigNum) -> Result<BigNum, BnError> {
        if exp.is_zero() {
            // a^0 = 1, except mod 1 where everything collapses to 0
            if self.modulus.is_one() {
                return Ok(BigNum::zero());
            }
            return Ok(BigNum::one());
        }

        let exp_bits = exp.bit_len();
        let window = window_bits_for(exp_bits);

        let base_mont = self.to_mont(base)?;
        let mut table = Vec::with_capacity(1 << window);
        table.push(self.to_mont(&BigNum::one())?);
        table.push(base_mont.clone());
        for i in 2..(1usize << window) {
            table.push(self.mont_mul(&table[i - 1], &base_mont));
        }

        let mut acc = table[0].clone();
        let mut remaining = exp_bits;
        while remaining > 0 {
            let take = window.min(remaining);
            remaining -= take;

            for _ in 0..take {
                acc = self.mont_sqr(&acc);
            }

            let mut value = 0usize;
            for b in 0..take {
                value |= (exp.get_bit(remaining + b) as usize) << b;
            }
            if value != 0 {
                acc = self.mont_mul(&acc, &table[value]);
            }
        }

        Ok(self.from_mont(&acc))
    }
}

/// Compute n' with n0 * n' == -1 (mod 2^64) by Newton iteration, doubling
/// the correct low bits each step.
fn neg_inv_mod_word(n0: Limb) -> Limb {
    debug_assert!(n0 & 1 == 1);
    let mut x: Limb = 1;
    for _ in 0..6 {
        x = x.wrapping_mul(2u64.wrapping_sub(n0.wrapping_mul(x)));
    }
    x.wrapping_neg()
}

/// Window size for the exponentiation table, by exponent length.
fn window_bits_for(bits: usize) -> usize {
    if bits > 512 {
        6
    } else if bits > 256 {
        5
    } else if bits > 128 {
        4
    } else if bits > 64 {
        3
    } else if bits > 32 {
        2
    } else {
        1
    }
}
