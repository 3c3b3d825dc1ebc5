//! Streaming hash boundary.
//!
//! Domain-parameter generation consumes a hash through this trait; no
//! concrete digest lives in this crate.

use numeria_types::BnError;

/// A streaming message digest.
pub trait Digest {
    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), BnError>;

    /// Finalize the hash and write the digest to `out`, then reset.
    /// `out` must be at least `output_size()` bytes.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), BnError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);
}
