use std::collections::BTreeMap;

use fabassert_crypto::{key_hash, value_hash};

use crate::envelope::{
    ChaincodeAction, ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeEventMessage,
    ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec, ChaincodeProposalPayload, ChaincodeSpec,
    ChannelHeader, CollectionHashedReadWriteSet, Envelope, HashedReadWriteSet, Header, HexBytes,
    KvRead, KvReadHash, KvReadWriteSet, KvWrite, KvWriteHash, NsReadWriteSet, Payload,
    ProposalResponsePayload, Response, TransactionAction, TransactionData, TxReadWriteSet,
};

/// Fluent builder for simulated transaction envelopes.
///
/// Private keys and values are hashed the way a peer hashes them, so the
/// resulting envelope decodes exactly like one fetched from a live ledger.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    tx_id: String,
    channel_id: String,
    chaincode: String,
    args: Vec<String>,
    namespaces: BTreeMap<String, NsReadWriteSet>,
    event: Option<ChaincodeEventMessage>,
    response: Response,
}

impl TransactionBuilder {
    /// Start a transaction with a successful (status 200) empty response.
    pub fn new(tx_id: &str, channel_id: &str, chaincode: &str) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            channel_id: channel_id.to_string(),
            chaincode: chaincode.to_string(),
            args: Vec::new(),
            namespaces: BTreeMap::new(),
            event: None,
            response: Response {
                status: 200,
                ..Default::default()
            },
        }
    }

    /// Set the invoked function and its parameters.
    pub fn invoke<I, S>(mut self, function: &str, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args = std::iter::once(function.to_string())
            .chain(parameters.into_iter().map(|p| p.as_ref().to_string()))
            .collect();
        self
    }

    pub fn public_write(self, key: &str, value: &str) -> Self {
        let chaincode = self.chaincode.clone();
        self.namespace_write(&chaincode, key, value)
    }

    pub fn public_delete(mut self, key: &str) -> Self {
        let chaincode = self.chaincode.clone();
        self.kv(&chaincode).writes.push(KvWrite {
            key: key.to_string(),
            is_delete: true,
            value: HexBytes::default(),
        });
        self
    }

    pub fn public_read(mut self, key: &str) -> Self {
        let chaincode = self.chaincode.clone();
        self.kv(&chaincode).reads.push(KvRead {
            key: key.to_string(),
            version: None,
        });
        self
    }

    /// Record a public write under an arbitrary namespace (e.g. a system chaincode).
    pub fn namespace_write(mut self, namespace: &str, key: &str, value: &str) -> Self {
        self.kv(namespace).writes.push(KvWrite {
            key: key.to_string(),
            is_delete: false,
            value: HexBytes::from(value),
        });
        self
    }

    pub fn private_write(mut self, collection: &str, key: &str, value: &str) -> Self {
        self.hashed(collection).hashed_writes.push(KvWriteHash {
            key_hash: HexBytes(key_hash(key).as_bytes().to_vec()),
            is_delete: false,
            value_hash: HexBytes(value_hash(value.as_bytes()).as_bytes().to_vec()),
        });
        self
    }

    pub fn private_delete(mut self, collection: &str, key: &str) -> Self {
        self.hashed(collection).hashed_writes.push(KvWriteHash {
            key_hash: HexBytes(key_hash(key).as_bytes().to_vec()),
            is_delete: true,
            value_hash: HexBytes::default(),
        });
        self
    }

    pub fn private_read(mut self, collection: &str, key: &str) -> Self {
        self.hashed(collection).hashed_reads.push(KvReadHash {
            key_hash: HexBytes(key_hash(key).as_bytes().to_vec()),
            version: None,
        });
        self
    }

    /// Add a collection entry with no reads or writes.
    pub fn empty_collection(mut self, collection: &str) -> Self {
        self.hashed(collection);
        self
    }

    pub fn event(mut self, name: &str, data: &str) -> Self {
        self.event = Some(ChaincodeEventMessage {
            chaincode_id: self.chaincode.clone(),
            tx_id: self.tx_id.clone(),
            event_name: name.to_string(),
            payload: HexBytes::from(data),
        });
        self
    }

    pub fn response(mut self, status: i32, message: &str, payload: &str) -> Self {
        self.response = Response {
            status,
            message: message.to_string(),
            payload: HexBytes::from(payload),
        };
        self
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn build(self) -> Envelope {
        let spec = ChaincodeSpec {
            chaincode_id: Some(ChaincodeId {
                name: self.chaincode.clone(),
                version: "1.0".into(),
            }),
            input: Some(ChaincodeInput {
                args: self.args.iter().map(|a| HexBytes::from(a.as_str())).collect(),
            }),
        };

        let extension = ChaincodeAction {
            results: Some(TxReadWriteSet {
                ns_rwset: self.namespaces.into_values().collect(),
            }),
            events: self.event,
            response: Some(self.response),
        };

        let action = TransactionAction {
            payload: Some(ChaincodeActionPayload {
                chaincode_proposal_payload: Some(ChaincodeProposalPayload {
                    input: Some(ChaincodeInvocationSpec {
                        chaincode_spec: Some(spec),
                    }),
                }),
                action: Some(ChaincodeEndorsedAction {
                    proposal_response_payload: Some(ProposalResponsePayload {
                        extension: Some(extension),
                    }),
                }),
            }),
        };

        Envelope {
            payload: Some(Payload {
                header: Some(Header {
                    channel_header: Some(ChannelHeader {
                        tx_id: self.tx_id,
                        channel_id: self.channel_id,
                        timestamp: None,
                    }),
                }),
                data: Some(TransactionData {
                    actions: vec![action],
                }),
            }),
        }
    }

    fn namespace(&mut self, namespace: &str) -> &mut NsReadWriteSet {
        self.namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| NsReadWriteSet {
                namespace: namespace.to_string(),
                ..Default::default()
            })
    }

    fn kv(&mut self, namespace: &str) -> &mut KvReadWriteSet {
        self.namespace(namespace)
            .rwset
            .get_or_insert_with(KvReadWriteSet::default)
    }

    fn hashed(&mut self, collection: &str) -> &mut HashedReadWriteSet {
        let chaincode = self.chaincode.clone();
        let ns = self.namespace(&chaincode);
        let index = match ns
            .collection_hashed_rwset
            .iter()
            .position(|c| c.collection_name == collection)
        {
            Some(index) => index,
            None => {
                ns.collection_hashed_rwset.push(CollectionHashedReadWriteSet {
                    collection_name: collection.to_string(),
                    hashed_rwset: Some(HashedReadWriteSet::default()),
                });
                ns.collection_hashed_rwset.len() - 1
            }
        };
        ns.collection_hashed_rwset[index]
            .hashed_rwset
            .get_or_insert_with(HashedReadWriteSet::default)
    }
}
