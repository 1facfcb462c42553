//! Typed content hashes for the sharded payload cache.
//!
//! A [`ContentHash`] is a 40-character lowercase hex string naming a piece of
//! content independent of its location. The first two characters select the
//! shard directory, the remaining 38 name the payload inside it; the split
//! only spreads files across subdirectories and carries no other meaning.
//!
//! Validation happens at construction, so a `ContentHash` held anywhere in
//! the pipeline is known well-formed before it reaches a URL or a path.

pub use self::error::{HashError, Result};

mod error;

use std::fmt;
use std::str::FromStr;

/// Total hash length in characters.
pub const HASH_LEN: usize = 40;

/// Length of the shard-directory prefix.
pub const PREFIX_LEN: usize = 2;

/// A validated 40-character lowercase hex content hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Validate and wrap a hash string.
    ///
    /// Rejects anything that is not exactly [`HASH_LEN`] characters of
    /// lowercase `[0-9a-f]`. Uppercase is rejected rather than folded: the
    /// remote store is keyed lowercase, and folding would make two spellings
    /// of the same key.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != HASH_LEN {
            return Err(HashError::Length(s.len()));
        }

        if let Some((index, byte)) = s
            .bytes()
            .enumerate()
            .find(|&(_, b)| !matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(HashError::Charset { byte, index });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// First [`PREFIX_LEN`] characters, the shard directory name.
    pub fn prefix(&self) -> &str { &self.0[..PREFIX_LEN] }

    /// Remaining characters, the payload file name inside the shard.
    pub fn suffix(&self) -> &str { &self.0[PREFIX_LEN..] }
}

impl FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str { &self.0 }
}
