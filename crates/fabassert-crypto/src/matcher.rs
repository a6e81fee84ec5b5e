use fabassert_types::{KeyHash, ValueHash};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a plaintext key, as a peer records it in a hashed rw-set.
pub fn key_hash(key: &str) -> KeyHash {
    KeyHash::from_digest(Sha256::digest(key.as_bytes()).into())
}

/// SHA-256 digest of a value written to a private collection.
pub fn value_hash(value: &[u8]) -> ValueHash {
    ValueHash::from_digest(Sha256::digest(value).into())
}

/// Matches one plaintext candidate key against hashed key sets.
///
/// The candidate's digest is computed once, so the same matcher can be
/// checked against the read or write set of several collections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyHashMatcher {
    digest: KeyHash,
}

impl KeyHashMatcher {
    pub fn new(candidate_key: &str) -> Self {
        Self {
            digest: key_hash(candidate_key),
        }
    }

    /// The candidate's digest.
    pub fn digest(&self) -> &KeyHash {
        &self.digest
    }

    /// Returns `true` iff the candidate's digest is in `hashes`.
    pub fn is_in<'a, I>(&self, hashes: I) -> bool
    where
        I: IntoIterator<Item = &'a KeyHash>,
    {
        hashes.into_iter().any(|hash| *hash == self.digest)
    }

    /// Returns `true` iff `hashes` holds the candidate's digest and nothing else.
    pub fn is_only<'a, I>(&self, hashes: I) -> bool
    where
        I: IntoIterator<Item = &'a KeyHash>,
    {
        let mut seen = false;
        for hash in hashes {
            if *hash != self.digest {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// One-shot membership check.
    pub fn matches<'a, I>(candidate_key: &str, hashes: I) -> bool
    where
        I: IntoIterator<Item = &'a KeyHash>,
    {
        Self::new(candidate_key).is_in(hashes)
    }
}
