//! Truncated SHA-256 body checksums.
//!
//! Message headers embed a prefix of [`checksum`] computed over the body.
//! The tag is advisory: decoders only compare it when asked to.

use sha2::{Digest, Sha256};

/// Length of the full truncated checksum.
pub const CHECKSUM_LEN: usize = 16;

/// A 128-bit body checksum.
pub type Checksum = [u8; CHECKSUM_LEN];

/// First 16 bytes of the SHA-256 digest of `data`.
pub fn checksum(data: &[u8]) -> Checksum {
    let digest = Sha256::digest(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// The first `len` bytes of [`checksum`]. `len` is clamped to [`CHECKSUM_LEN`].
pub fn checksum_tag(data: &[u8], len: usize) -> Vec<u8> {
    let sum = checksum(data);
    sum[..len.min(CHECKSUM_LEN)].to_vec()
}

/// Returns true if `tag` is a prefix of the checksum of `data`.
///
/// An empty tag always verifies; a tag longer than [`CHECKSUM_LEN`] never does.
pub fn verify_tag(data: &[u8], tag: &[u8]) -> bool {
    if tag.len() > CHECKSUM_LEN {
        return false;
    }
    checksum(data)[..tag.len()] == *tag
}
