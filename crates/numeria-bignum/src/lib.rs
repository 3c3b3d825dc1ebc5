#![doc = "Arbitrary-precision integer engine with modular reduction and prime generation."]

mod bignum;
mod ct;
mod digest;
mod div;
mod genprime;
mod limb;
mod montgomery;
mod numthry;
mod ops;
mod prime;
mod rand;
mod reduce;

mod dsa_param;

pub use bignum::{BigNum, Sign};
pub use digest::Digest;
pub use dsa_param::{generate_dsa_primes, generate_dsa_primes_with_seed, verify_dsa_primes};
pub use genprime::{random_prime, random_prime_simple, random_safe_prime};
pub use montgomery::MontgomeryCtx;
pub use numthry::{mul_add, power, power_mod, square, sub_mul};
pub use prime::{is_prime, passes_mr_tests, trial_division, verify_prime, MillerRabin, Screen};
pub use rand::{OsRandom, RandomSource};
pub use reduce::BarrettCtx;
