//! Words, digests and the hash function that maps one to the other.

use serde::{Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;

pub const DIGEST_LEN: usize = 32;

/// A single line read from a source, without its line terminator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word(Vec<u8>);

impl Word {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

/// Lossy UTF-8, meant for logs and JSON. Exact output goes through
/// [`Word::as_bytes`].
impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Fixed-length 256-bit digest of a [`Word`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;

        let mut out = String::with_capacity(DIGEST_LEN * 2);
        for b in &self.0 {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Unit of work handed from the hasher pool to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub digest: Digest,
    pub word: Word,
}

/// Pure, deterministic word -> digest function.
pub trait WordHasher: Send + Sync {
    fn digest(&self, word: &[u8]) -> Digest;

    fn pair(&self, word: Word) -> Pair {
        let digest = self.digest(word.as_bytes());
        Pair { digest, word }
    }
}

/// SHA-256 hasher used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WordHasher for Sha256Hasher {
    fn digest(&self, word: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(word);
        Digest(hasher.finalize().into())
    }
}
