use std::collections::{BTreeMap, BTreeSet};

use fabassert_crypto::ContentHasher;
use fabassert_types::{
    ChaincodeEvent, KeyHash, RecordParts, TransactionRecord, TxResponse, ValueHash,
};
use tracing::debug;

use crate::envelope::{Block, ChaincodeAction, ChaincodeSpec, Envelope, NsReadWriteSet};
use crate::error::DecodeError;

/// Parse a raw block and decode one of its transactions.
pub fn decode_bytes(raw: &[u8], transaction_id: &str) -> Result<TransactionRecord, DecodeError> {
    let block = Block::from_slice(raw)
        .map_err(|e| DecodeError::not_found(transaction_id, format!("unreadable envelope: {e}")))?;
    decode(&block, transaction_id)
}

/// Decode the transaction `transaction_id` from `block`.
///
/// Fails with [`DecodeError::NotFound`] if the block does not list the
/// transaction or if any structure the record needs is missing.
pub fn decode(block: &Block, transaction_id: &str) -> Result<TransactionRecord, DecodeError> {
    let envelope = block
        .envelopes()
        .iter()
        .find(|env| env.transaction_id() == Some(transaction_id))
        .ok_or_else(|| DecodeError::not_found(transaction_id, "not listed in envelope"))?;

    let record = decode_envelope(envelope, transaction_id)?;
    debug!(
        tx_id = %transaction_id,
        fingerprint = %ContentHasher::RECORD.fingerprint(&record),
        "decoded transaction record"
    );
    Ok(record)
}

fn decode_envelope(envelope: &Envelope, tx_id: &str) -> Result<TransactionRecord, DecodeError> {
    let missing = |what: &str| DecodeError::not_found(tx_id, format!("missing {what}"));

    let channel_header = envelope.channel_header().ok_or_else(|| missing("channel header"))?;

    let action_payload = envelope
        .payload
        .as_ref()
        .and_then(|p| p.data.as_ref())
        .and_then(|d| d.actions.first())
        .and_then(|a| a.payload.as_ref())
        .ok_or_else(|| missing("transaction action"))?;

    let spec = action_payload
        .chaincode_proposal_payload
        .as_ref()
        .and_then(|p| p.input.as_ref())
        .and_then(|i| i.chaincode_spec.as_ref())
        .ok_or_else(|| missing("chaincode spec"))?;

    let extension = action_payload
        .action
        .as_ref()
        .and_then(|a| a.proposal_response_payload.as_ref())
        .and_then(|p| p.extension.as_ref())
        .ok_or_else(|| missing("chaincode action extension"))?;

    let (chaincode_name, function_name, parameters) = decode_invocation(spec, tx_id)?;

    let mut parts = RecordParts {
        transaction_id: tx_id.to_string(),
        channel_id: channel_header.channel_id.clone(),
        chaincode_name,
        function_name,
        parameters,
        event: decode_event(extension),
        response: decode_response(extension, tx_id)?,
        ..Default::default()
    };

    let results = extension.results.as_ref().ok_or_else(|| missing("rw-set results"))?;
    if let Some(ns) = results
        .ns_rwset
        .iter()
        .find(|ns| ns.namespace == parts.chaincode_name)
    {
        decode_rwset(ns, &mut parts, tx_id)?;
    }

    Ok(TransactionRecord::new(parts))
}

fn decode_invocation(
    spec: &ChaincodeSpec,
    tx_id: &str,
) -> Result<(String, String, Vec<String>), DecodeError> {
    let chaincode_name = spec
        .chaincode_id
        .as_ref()
        .map(|id| id.name.clone())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DecodeError::not_found(tx_id, "missing chaincode id"))?;

    let mut args = spec
        .input
        .as_ref()
        .map(|input| input.args.iter().map(|arg| arg.to_text()))
        .ok_or_else(|| DecodeError::not_found(tx_id, "missing chaincode input"))?;

    let function_name = args
        .next()
        .ok_or_else(|| DecodeError::not_found(tx_id, "invocation has no function name"))?;

    Ok((chaincode_name, function_name, args.collect()))
}

fn decode_rwset(
    ns: &NsReadWriteSet,
    parts: &mut RecordParts,
    tx_id: &str,
) -> Result<(), DecodeError> {
    if let Some(rwset) = &ns.rwset {
        parts.public_reads = rwset.reads.iter().map(|r| r.key.clone()).collect();
        parts.public_writes = rwset
            .writes
            .iter()
            .map(|w| {
                let value = if w.is_delete { String::new() } else { w.value.to_text() };
                (w.key.clone(), value)
            })
            .collect();
    }

    let bad_hash = |collection: &str, e: fabassert_types::TypeError| {
        DecodeError::not_found(tx_id, format!("bad digest in collection {collection}: {e}"))
    };

    let mut private_writes: BTreeMap<String, BTreeSet<(KeyHash, ValueHash)>> = BTreeMap::new();
    let mut private_reads: BTreeMap<String, BTreeSet<KeyHash>> = BTreeMap::new();

    for collection in &ns.collection_hashed_rwset {
        let Some(hashed) = &collection.hashed_rwset else {
            continue;
        };
        let name = collection.collection_name.as_str();

        for write in &hashed.hashed_writes {
            let key = KeyHash::from_slice(&write.key_hash.0).map_err(|e| bad_hash(name, e))?;
            let value = if write.is_delete && write.value_hash.0.is_empty() {
                ValueHash::from_digest([0u8; fabassert_types::DIGEST_LEN])
            } else {
                ValueHash::from_slice(&write.value_hash.0).map_err(|e| bad_hash(name, e))?
            };
            private_writes.entry(name.to_string()).or_default().insert((key, value));
        }

        for read in &hashed.hashed_reads {
            let key = KeyHash::from_slice(&read.key_hash.0).map_err(|e| bad_hash(name, e))?;
            private_reads.entry(name.to_string()).or_default().insert(key);
        }
    }

    parts.private_writes = private_writes;
    parts.private_reads = private_reads;
    Ok(())
}

fn decode_event(extension: &ChaincodeAction) -> Option<ChaincodeEvent> {
    extension
        .events
        .as_ref()
        .filter(|event| !event.chaincode_id.is_empty())
        .map(|event| ChaincodeEvent {
            name: event.event_name.clone(),
            data: event.payload.to_text(),
        })
}

fn decode_response(extension: &ChaincodeAction, tx_id: &str) -> Result<TxResponse, DecodeError> {
    let response = extension
        .response
        .as_ref()
        .ok_or_else(|| DecodeError::not_found(tx_id, "missing chaincode response"))?;
    Ok(TxResponse {
        status: response.status,
        message: response.message.clone(),
        payload: response.payload.to_text(),
    })
}
