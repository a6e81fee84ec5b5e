//! Serde model of a decoded Fabric block.
//!
//! Field names follow the JSON rendering produced by the Fabric SDKs'
//! block decoders; byte fields are hex-encoded. Sub-messages are `Option`
//! because protobuf omits empty messages, and the decoder, not serde,
//! decides which gaps are fatal.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Opaque bytes, hex-encoded on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexBytes(#[serde(with = "hex::serde")] pub Vec<u8>);

impl HexBytes {
    /// Lossy UTF-8 rendering of the bytes.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for HexBytes {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub header: Option<BlockHeader>,
    #[serde(default)]
    pub data: Option<BlockData>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub number: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default)]
    pub data: Vec<Envelope>,
}

impl Block {
    /// Build a block holding the given transaction envelopes.
    pub fn new(number: u64, envelopes: Vec<Envelope>) -> Self {
        Self {
            header: Some(BlockHeader { number }),
            data: Some(BlockData { data: envelopes }),
        }
    }

    /// Parse a block from its raw JSON bytes.
    pub fn from_slice(raw: &[u8]) -> LedgerResult<Self> {
        serde_json::from_slice(raw).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Serialize the block to raw JSON bytes.
    pub fn to_vec(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// The transaction envelopes in block order.
    pub fn envelopes(&self) -> &[Envelope] {
        self.data.as_ref().map(|d| d.data.as_slice()).unwrap_or(&[])
    }

    /// Ids of every transaction whose header carries one.
    pub fn transaction_ids(&self) -> Vec<&str> {
        self.envelopes().iter().filter_map(Envelope::transaction_id).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl Envelope {
    pub fn channel_header(&self) -> Option<&ChannelHeader> {
        self.payload.as_ref()?.header.as_ref()?.channel_header.as_ref()
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.channel_header().map(|h| h.tx_id.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default)]
    pub data: Option<TransactionData>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub channel_header: Option<ChannelHeader>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    #[serde(default)]
    pub actions: Vec<TransactionAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAction {
    #[serde(default)]
    pub payload: Option<ChaincodeActionPayload>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeActionPayload {
    #[serde(default)]
    pub chaincode_proposal_payload: Option<ChaincodeProposalPayload>,
    #[serde(default)]
    pub action: Option<ChaincodeEndorsedAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeProposalPayload {
    #[serde(default)]
    pub input: Option<ChaincodeInvocationSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInvocationSpec {
    #[serde(default)]
    pub chaincode_spec: Option<ChaincodeSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeSpec {
    #[serde(default)]
    pub chaincode_id: Option<ChaincodeId>,
    #[serde(default)]
    pub input: Option<ChaincodeInput>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeId {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInput {
    #[serde(default)]
    pub args: Vec<HexBytes>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEndorsedAction {
    #[serde(default)]
    pub proposal_response_payload: Option<ProposalResponsePayload>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponsePayload {
    #[serde(default)]
    pub extension: Option<ChaincodeAction>,
}

/// The chaincode action extension: rw-sets, event and response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeAction {
    #[serde(default)]
    pub results: Option<TxReadWriteSet>,
    #[serde(default)]
    pub events: Option<ChaincodeEventMessage>,
    #[serde(default)]
    pub response: Option<Response>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReadWriteSet {
    #[serde(default)]
    pub ns_rwset: Vec<NsReadWriteSet>,
}

/// Read/write set of one chaincode namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NsReadWriteSet {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub rwset: Option<KvReadWriteSet>,
    #[serde(default)]
    pub collection_hashed_rwset: Vec<CollectionHashedReadWriteSet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvReadWriteSet {
    #[serde(default)]
    pub reads: Vec<KvRead>,
    #[serde(default)]
    pub writes: Vec<KvWrite>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub block_num: u64,
    #[serde(default)]
    pub tx_num: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvRead {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub version: Option<Version>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvWrite {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub is_delete: bool,
    #[serde(default)]
    pub value: HexBytes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionHashedReadWriteSet {
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub hashed_rwset: Option<HashedReadWriteSet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedReadWriteSet {
    #[serde(default)]
    pub hashed_reads: Vec<KvReadHash>,
    #[serde(default)]
    pub hashed_writes: Vec<KvWriteHash>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvReadHash {
    #[serde(default)]
    pub key_hash: HexBytes,
    #[serde(default)]
    pub version: Option<Version>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvWriteHash {
    #[serde(default)]
    pub key_hash: HexBytes,
    #[serde(default)]
    pub is_delete: bool,
    #[serde(default)]
    pub value_hash: HexBytes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEventMessage {
    #[serde(default)]
    pub chaincode_id: String,
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub payload: HexBytes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub payload: HexBytes,
}
