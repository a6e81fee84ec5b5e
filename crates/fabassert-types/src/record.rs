use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::{KeyHash, ValueHash};

/// Status codes at or above this threshold mark a failed execution.
const ERROR_THRESHOLD: i32 = 400;
/// Lowest status code of a successful execution.
const OK: i32 = 200;

/// A chaincode event emitted by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Event name chosen by the chaincode.
    pub name: String,
    /// Event payload, interpreted as UTF-8 text.
    pub data: String,
}

/// The execution response recorded for a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub status: i32,
    pub message: String,
    /// Response payload, interpreted as UTF-8 text (empty when absent).
    pub payload: String,
}

impl TxResponse {
    /// Returns `true` if the status code denotes a successful execution.
    pub fn is_success(&self) -> bool {
        (OK..ERROR_THRESHOLD).contains(&self.status)
    }
}

/// Owned field bundle used to assemble a [`TransactionRecord`].
///
/// Private read/write maps may contain empty sets here; they are dropped
/// when the record is built so that an absent collection always means
/// "no activity observed".
#[derive(Clone, Debug, Default)]
pub struct RecordParts {
    pub transaction_id: String,
    pub channel_id: String,
    pub chaincode_name: String,
    pub function_name: String,
    pub parameters: Vec<String>,
    pub public_writes: BTreeSet<(String, String)>,
    pub public_reads: BTreeSet<String>,
    pub private_writes: BTreeMap<String, BTreeSet<(KeyHash, ValueHash)>>,
    pub private_reads: BTreeMap<String, BTreeSet<KeyHash>>,
    pub event: Option<ChaincodeEvent>,
    pub response: TxResponse,
}

/// Structured, queryable facts about one ledger transaction.
///
/// Immutable once built: every field is private and only exposed through
/// borrowing accessors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    transaction_id: String,
    channel_id: String,
    chaincode_name: String,
    function_name: String,
    parameters: Vec<String>,
    public_writes: BTreeSet<(String, String)>,
    public_reads: BTreeSet<String>,
    private_writes: BTreeMap<String, BTreeSet<(KeyHash, ValueHash)>>,
    private_reads: BTreeMap<String, BTreeSet<KeyHash>>,
    event: Option<ChaincodeEvent>,
    response: TxResponse,
}

impl TransactionRecord {
    /// Assemble a record, discarding collections with no observed activity.
    pub fn new(mut parts: RecordParts) -> Self {
        parts.private_writes.retain(|_, writes| !writes.is_empty());
        parts.private_reads.retain(|_, reads| !reads.is_empty());

        Self {
            transaction_id: parts.transaction_id,
            channel_id: parts.channel_id,
            chaincode_name: parts.chaincode_name,
            function_name: parts.function_name,
            parameters: parts.parameters,
            public_writes: parts.public_writes,
            public_reads: parts.public_reads,
            private_writes: parts.private_writes,
            private_reads: parts.private_reads,
            event: parts.event,
            response: parts.response,
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    /// First invocation argument.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Remaining invocation arguments, in call order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn public_writes(&self) -> &BTreeSet<(String, String)> {
        &self.public_writes
    }

    pub fn public_reads(&self) -> &BTreeSet<String> {
        &self.public_reads
    }

    pub fn private_writes(&self) -> &BTreeMap<String, BTreeSet<(KeyHash, ValueHash)>> {
        &self.private_writes
    }

    pub fn private_reads(&self) -> &BTreeMap<String, BTreeSet<KeyHash>> {
        &self.private_reads
    }

    pub fn event(&self) -> Option<&ChaincodeEvent> {
        self.event.as_ref()
    }

    pub fn response(&self) -> &TxResponse {
        &self.response
    }

    /// Returns `true` if the transaction wrote to the given private collection.
    pub fn writes_to(&self, collection: &str) -> bool {
        self.private_writes.contains_key(collection)
    }

    /// Returns `true` if the transaction read from the given private collection.
    pub fn reads_from(&self, collection: &str) -> bool {
        self.private_reads.contains_key(collection)
    }

    /// Names of all private collections written, in sorted order.
    pub fn written_collections(&self) -> impl Iterator<Item = &str> {
        self.private_writes.keys().map(String::as_str)
    }

    /// Names of all private collections read, in sorted order.
    pub fn read_collections(&self) -> impl Iterator<Item = &str> {
        self.private_reads.keys().map(String::as_str)
    }

    /// Key digests written to a collection (empty if none).
    pub fn written_key_hashes<'a>(&'a self, collection: &str) -> impl Iterator<Item = &'a KeyHash> {
        self.private_writes
            .get(collection)
            .into_iter()
            .flat_map(|writes| writes.iter().map(|(key, _)| key))
    }

    /// Key digests read from a collection (empty if none).
    pub fn read_key_hashes<'a>(&'a self, collection: &str) -> impl Iterator<Item = &'a KeyHash> {
        self.private_reads.get(collection).into_iter().flatten()
    }

    /// Returns `true` if the given public key was written.
    pub fn writes_public_key(&self, key: &str) -> bool {
        self.public_writes.iter().any(|(k, _)| k == key)
    }

    /// Returns `true` if the given public key was read.
    pub fn reads_public_key(&self, key: &str) -> bool {
        self.public_reads.contains(key)
    }

    pub fn is_successful(&self) -> bool {
        self.response.is_success()
    }

    pub fn has_payload(&self) -> bool {
        !self.response.payload.is_empty()
    }

    pub fn has_message(&self) -> bool {
        !self.response.message.is_empty()
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}/{}] {}({})",
            self.transaction_id,
            self.channel_id,
            self.chaincode_name,
            self.function_name,
            self.parameters.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> RecordParts {
        RecordParts {
            transaction_id: "tx1".into(),
            channel_id: "mychannel".into(),
            chaincode_name: "assets".into(),
            function_name: "createKeyValue".into(),
            parameters: vec!["k1".into(), "100".into()],
            public_writes: BTreeSet::from([("k1".to_string(), "100".to_string())]),
            public_reads: BTreeSet::from(["k1".to_string()]),
            response: TxResponse {
                status: 200,
                message: String::new(),
                payload: String::new(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_private_sets_are_dropped() {
        let mut p = parts();
        p.private_writes.insert("org1Collection".into(), BTreeSet::new());
        p.private_reads.insert("org2Collection".into(), BTreeSet::new());
        p.private_reads.insert(
            "org3Collection".into(),
            BTreeSet::from([KeyHash::from_digest([1; 32])]),
        );

        let record = TransactionRecord::new(p);
        assert!(!record.writes_to("org1Collection"));
        assert!(!record.reads_from("org2Collection"));
        assert!(record.reads_from("org3Collection"));
        assert_eq!(record.read_collections().collect::<Vec<_>>(), vec!["org3Collection"]);
    }

    #[test]
    fn public_key_lookups() {
        let record = TransactionRecord::new(parts());
        assert!(record.writes_public_key("k1"));
        assert!(!record.writes_public_key("k2"));
        assert!(record.reads_public_key("k1"));
    }

    #[test]
    fn key_hash_iterators_are_empty_for_unknown_collections() {
        let record = TransactionRecord::new(parts());
        assert_eq!(record.written_key_hashes("nope").count(), 0);
        assert_eq!(record.read_key_hashes("nope").count(), 0);
    }

    #[test]
    fn success_threshold() {
        let mut response = TxResponse::default();
        response.status = 200;
        assert!(response.is_success());
        response.status = 399;
        assert!(response.is_success());
        response.status = 400;
        assert!(!response.is_success());
        response.status = 500;
        assert!(!response.is_success());
        response.status = 0;
        assert!(!response.is_success());
    }

    #[test]
    fn payload_and_message_presence() {
        let mut p = parts();
        p.response.payload = "value".into();
        let record = TransactionRecord::new(p);
        assert!(record.has_payload());
        assert!(!record.has_message());
    }

    #[test]
    fn display_includes_invocation() {
        let record = TransactionRecord::new(parts());
        let display = format!("{record}");
        assert!(display.contains("tx1"));
        assert!(display.contains("createKeyValue(k1, 100)"));
    }
}
