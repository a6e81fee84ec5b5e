use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length in bytes of the digests recorded in hashed rw-sets.
pub const DIGEST_LEN: usize = 32;

fn digest_from_slice(bytes: &[u8]) -> Result<[u8; DIGEST_LEN], TypeError> {
    if bytes.len() != DIGEST_LEN {
        return Err(TypeError::InvalidLength {
            expected: DIGEST_LEN,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; DIGEST_LEN];
    arr.copy_from_slice(bytes);
    Ok(arr)
}

/// Digest of a private-collection key, as committed to the ledger.
///
/// Plaintext private keys never appear in a transaction record; callers
/// recompute the digest of a candidate key and compare it against these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyHash(#[serde(with = "hex::serde")] [u8; DIGEST_LEN]);

impl KeyHash {
    /// Wrap a pre-computed digest.
    pub const fn from_digest(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }

    /// Build from a byte slice taken off the wire.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        digest_from_slice(bytes).map(Self)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({})", self.short_hex())
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for KeyHash {
    fn from(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }
}

/// Digest of a value written to a private collection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueHash(#[serde(with = "hex::serde")] [u8; DIGEST_LEN]);

impl ValueHash {
    /// Wrap a pre-computed digest.
    pub const fn from_digest(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }

    /// Build from a byte slice taken off the wire.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        digest_from_slice(bytes).map(Self)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for ValueHash {
    fn from(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }
}
