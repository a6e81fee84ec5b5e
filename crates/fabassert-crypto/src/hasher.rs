use serde::Serialize;

/// BLAKE3 digests tagged with the kind of value they cover, for log fields.
///
/// A record and a block with identical bytes still get different digests.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Decoded transaction records.
    pub const RECORD: Self = Self {
        domain: "fabassert-record-v1",
    };
    /// Serialized ledger blocks.
    pub const ENVELOPE: Self = Self {
        domain: "fabassert-envelope-v1",
    };

    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// First four digest bytes of the JSON form of `value`, as hex.
    ///
    /// `"unavailable"` if `value` does not serialize.
    pub fn fingerprint<T: Serialize>(&self, value: &T) -> String {
        match serde_json::to_vec(value) {
            Ok(data) => hex::encode(&self.hash(&data)[..4]),
            Err(_) => "unavailable".to_string(),
        }
    }
}
