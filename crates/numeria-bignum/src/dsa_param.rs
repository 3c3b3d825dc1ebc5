//! FIPS 186-3 DSA domain parameter generation.
//!
//! Both primes are derived from a public seed through a caller-supplied
//! digest, so a verifier can replay the derivation and confirm the pair
//! was not chosen with a trapdoor in mind.

use numeria_types::BnError;

use crate::bignum::BigNum;
use crate::digest::Digest;
use crate::prime::is_prime;
use crate::rand::RandomSource;

/// Candidates for p tried per seed before giving up on it.
const P_ATTEMPTS: usize = 4096;

fn valid_size(pbits: usize, qbits: usize) -> bool {
    match qbits {
        160 => pbits == 512 || pbits == 768 || pbits == 1024,
        224 => pbits == 2048,
        256 => pbits == 2048 || pbits == 3072,
        _ => false,
    }
}

/// Treat the seed buffer as a big-endian counter and add one.
fn increment(seed: &mut [u8]) {
    for b in seed.iter_mut().rev() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}

fn hash_once(hash: &mut dyn Digest, data: &[u8], out: &mut [u8]) -> Result<(), BnError> {
    hash.reset();
    hash.update(data)?;
    hash.finish(out)
}

/// Attempt DSA prime derivation from a specific seed.
///
/// Returns `Ok(None)` when the seed does not yield a prime q or no prime p
/// is found within the attempt bound; the caller picks a fresh seed and
/// retries. The digest's output width must match `qbits`.
pub fn generate_dsa_primes_with_seed(
    rng: &mut dyn RandomSource,
    hash: &mut dyn Digest,
    pbits: usize,
    qbits: usize,
    seed: &[u8],
) -> Result<Option<(BigNum, BigNum)>, BnError> {
    if !valid_size(pbits, qbits) {
        return Err(BnError::InvalidParamSizes { pbits, qbits });
    }
    if qbits == 224 {
        return Err(BnError::NotSupported);
    }
    if seed.len() * 8 < qbits {
        return Err(BnError::SeedTooShort {
            need: qbits / 8,
            got: seed.len(),
        });
    }

    let h = hash.output_size();
    if h * 8 != qbits {
        return Err(BnError::InvalidArg);
    }

    let mut seed = seed.to_vec();
    let mut block = vec![0u8; h];

    hash_once(hash, &seed, &mut block)?;
    let mut q = BigNum::from_bytes_be(&block);
    q.set_bit(qbits - 1);
    q.set_bit(0);

    if !is_prime(rng, &q)? {
        return Ok(None);
    }

    let n = (pbits - 1) / (h * 8);
    let b = (pbits - 1) % (h * 8);

    let two_q = q.shl(1);
    let one = BigNum::one();
    let mut v = vec![0u8; h * (n + 1)];

    for _ in 0..P_ATTEMPTS {
        // fill v with hash blocks, counting the seed up; the last block
        // produced lands at the front so the stream reads big-endian
        for k in 0..=n {
            increment(&mut seed);
            hash_once(hash, &seed, &mut block)?;
            v[h * (n - k)..h * (n - k + 1)].copy_from_slice(&block);
        }

        let mut x = BigNum::from_bytes_be(&v[(h - 1 - b / 8)..]);
        x.set_bit(pbits - 1);

        // force p = 1 (mod 2q) so q divides the group order
        let rem = x.mod_reduce(&two_q)?;
        let p = x.sub(&rem).add(&one);

        if p.bit_len() == pbits && is_prime(rng, &p)? {
            return Ok(Some((p, q)));
        }
    }
    Ok(None)
}

/// Generate a DSA (p, q) pair, drawing fresh seeds until one works.
///
/// Returns the pair together with the seed that produced it.
pub fn generate_dsa_primes(
    rng: &mut dyn RandomSource,
    hash: &mut dyn Digest,
    pbits: usize,
    qbits: usize,
) -> Result<(BigNum, BigNum, Vec<u8>), BnError> {
    let mut seed = vec![0u8; qbits / 8];
    loop {
        rng.fill_bytes(&mut seed)?;
        if let Some((p, q)) = generate_dsa_primes_with_seed(rng, hash, pbits, qbits, &seed)? {
            return Ok((p, q, seed));
        }
    }
}

/// Replay the derivation for a claimed (p, q, seed) triple and check the
/// result matches.
pub fn verify_dsa_primes(
    rng: &mut dyn RandomSource,
    hash: &mut dyn Digest,
    p: &BigNum,
    q: &BigNum,
    seed: &[u8],
) -> Result<bool, BnError> {
    let pbits = p.bit_len();
    let qbits = q.bit_len();
    if !valid_size(pbits, qbits) {
        return Ok(false);
    }
    match generate_dsa_primes_with_seed(rng, hash, pbits, qbits, seed)? {
        Some((rp, rq)) => Ok(rp == *p && rq == *q),
        None => Ok(false),
    }
}
