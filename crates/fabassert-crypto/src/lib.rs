//! Hashing primitives for fabassert.
//!
//! Provides the SHA-256 key/value digests a Fabric peer records in hashed
//! private-collection rw-sets, the canonical composite-key encoding, and
//! domain-separated BLAKE3 fingerprints for decoded records.
//!
//! All digests come from `sha2` and `blake3`.

pub mod composite;
pub mod hasher;
pub mod matcher;

pub use composite::{build_composite_key, split_composite_key, CompositeKeyError, COMPOSITE_KEY_SEPARATOR};
pub use hasher::ContentHasher;
pub use matcher::{key_hash, value_hash, KeyHashMatcher};
