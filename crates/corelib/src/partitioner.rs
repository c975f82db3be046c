//! Partitioner abstraction: converts keys into ring tokens.
//!
//! Mirrors the teacher crate's `partitioner::Partitioner` trait, narrowed to
//! the one partitioner this design uses.

use crate::token::{Md5Token, Token};

/// A partitioner converts keys into tokens for placement on the hash ring.
pub trait Partitioner: Send + Sync + 'static {
    type TokenType: Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType;
    fn name(&self) -> &'static str;
}

/// MD5-based partitioner (the only partitioner this ring supports).
#[derive(Clone, Copy, Debug, Default)]
pub struct Md5Partitioner;

impl Partitioner for Md5Partitioner {
    type TokenType = Md5Token;

    fn partition(&self, key: &[u8]) -> Md5Token {
        Md5Token::from_bytes(key)
    }

    fn name(&self) -> &'static str {
        "Md5Partitioner"
    }
}
