//! Token abstraction: a position on the consistent hash ring.
//!
//! Kept as a trait (not a bare `u32`) so the ring logic in `crate::ring`
//! stays independent of the concrete hash function, the way the teacher
//! crate's `token`/`partitioner` split does — but narrowed to the handful of
//! operations the ring actually needs, and to a single real implementation,
//! `Md5Token`, matching the MD5-based 32-bit digest the design mandates.

use std::fmt::Debug;
use std::hash::Hash;

/// A position on the hash ring.
pub trait Token: Copy + Clone + Ord + Eq + Hash + Debug + Send + Sync + 'static {
    /// The minimum ring position.
    fn zero() -> Self;
    /// The maximum ring position.
    fn max() -> Self;
}

/// 32-bit MD5-derived token.
///
/// `H(s) = int(md5(s_utf8).hexdigest()[0:8], 16)` — the first 8 hex digits of
/// an MD5 digest are exactly its first 4 bytes, so this is
/// `u32::from_be_bytes(md5(s)[0..4])`. This must be preserved byte-for-byte:
/// configurations and reference fixtures generated against this hash depend
/// on it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Md5Token(pub u32);

impl Token for Md5Token {
    fn zero() -> Self {
        Md5Token(0)
    }

    fn max() -> Self {
        Md5Token(u32::MAX)
    }
}

impl Md5Token {
    /// Hash a UTF-8 key into a ring token.
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }

    /// Hash raw bytes into a ring token.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = md5::compute(data);
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&digest.0[0..4]);
        Md5Token(u32::from_be_bytes(buf))
    }
}

impl std::fmt::Display for Md5Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
