//! Predicates, grouped by the subject or operand they check.
//!
//! Each module adds methods to [`Chain`](crate::Chain) through its own
//! `impl` block.

pub mod channel;
pub mod keyvalue;
pub mod rwset;
pub mod state;
pub mod transaction;

#[cfg(test)]
pub(crate) mod fixtures {
    use fabassert_crypto::{key_hash, value_hash};
    use fabassert_types::{ChaincodeEvent, RecordParts, TransactionRecord, TxResponse};

    /// A record that writes `k1` publicly and `secret` to two collections.
    pub fn record() -> TransactionRecord {
        let mut parts = RecordParts {
            transaction_id: "tx1".into(),
            channel_id: "mychannel".into(),
            chaincode_name: "assertion-contract".into(),
            function_name: "createKeyValue".into(),
            parameters: vec!["k1".into(), "100".into()],
            event: Some(ChaincodeEvent {
                name: "created".into(),
                data: "k1".into(),
            }),
            response: TxResponse {
                status: 200,
                message: String::new(),
                payload: "ok".into(),
            },
            ..Default::default()
        };
        parts.public_writes.insert(("k1".into(), "100".into()));
        parts.public_reads.insert("k0".into());
        for collection in ["org1Collection", "org2Collection"] {
            parts
                .private_writes
                .entry(collection.into())
                .or_default()
                .insert((key_hash("secret"), value_hash(b"42")));
        }
        parts
            .private_reads
            .entry("org1Collection".into())
            .or_default()
            .insert(key_hash("secret"));
        TransactionRecord::new(parts)
    }

    /// A record with no storage activity, event or payload.
    pub fn bare_record() -> TransactionRecord {
        TransactionRecord::new(RecordParts {
            transaction_id: "tx2".into(),
            function_name: "noop".into(),
            response: TxResponse {
                status: 500,
                message: "asset already exists".into(),
                payload: String::new(),
            },
            ..Default::default()
        })
    }
}
