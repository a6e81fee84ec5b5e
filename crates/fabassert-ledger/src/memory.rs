use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use fabassert_crypto::ContentHasher;
use tracing::debug;

use crate::envelope::Block;
use crate::error::{LedgerError, LedgerResult};
use crate::traits::LedgerQuery;

/// In-memory ledger keyed by transaction id.
///
/// Intended for tests and simulated networks. Every transaction of an
/// appended block maps to that block's serialized bytes, the same shape a
/// peer's block-by-txid query returns.
pub struct InMemoryLedger {
    blocks: RwLock<HashMap<String, Vec<u8>>>,
    height: AtomicUsize,
    fetches: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
            height: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Append a block and index each of its transactions.
    pub fn append_block(&self, block: &Block) -> LedgerResult<()> {
        let raw = block.to_vec()?;
        let mut map = self.blocks.write().expect("lock poisoned");
        for tx_id in block.transaction_ids() {
            map.insert(tx_id.to_string(), raw.clone());
        }
        let height = self.height.fetch_add(1, Ordering::SeqCst) + 1;
        let digest = ContentHasher::ENVELOPE.hash(&raw);
        debug!(
            height,
            transactions = block.envelopes().len(),
            digest = %hex::encode(&digest[..4]),
            "appended block"
        );
        Ok(())
    }

    /// Store arbitrary bytes under a transaction id (e.g. a corrupt block).
    pub fn insert_raw(&self, transaction_id: &str, raw: Vec<u8>) {
        self.blocks
            .write()
            .expect("lock poisoned")
            .insert(transaction_id.to_string(), raw);
    }

    /// Number of blocks appended so far.
    pub fn height(&self) -> usize {
        self.height.load(Ordering::SeqCst)
    }

    /// Number of `fetch_envelope` calls served, hits and misses alike.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn contains(&self, transaction_id: &str) -> bool {
        self.blocks
            .read()
            .expect("lock poisoned")
            .contains_key(transaction_id)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerQuery for InMemoryLedger {
    async fn fetch_envelope(&self, transaction_id: &str) -> LedgerResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let map = self.blocks.read().expect("lock poisoned");
        map.get(transaction_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(transaction_id.to_string()))
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.blocks.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryLedger")
            .field("height", &self.height())
            .field("transaction_count", &count)
            .finish()
    }
}
