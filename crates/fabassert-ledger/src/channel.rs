use std::sync::Arc;

use fabassert_types::TransactionRecord;
use tracing::{debug, warn};

use crate::decoder::decode_bytes;
use crate::error::LedgerResult;
use crate::traits::LedgerQuery;

/// Handle on one channel's ledger.
///
/// Every lookup goes back to the ledger; nothing is cached between calls.
#[derive(Clone)]
pub struct Channel {
    name: String,
    ledger: Arc<dyn LedgerQuery>,
}

impl Channel {
    pub fn new(ledger: Arc<dyn LedgerQuery>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ledger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch and decode the transaction `transaction_id`.
    pub async fn get(&self, transaction_id: &str) -> LedgerResult<TransactionRecord> {
        let raw = self.ledger.fetch_envelope(transaction_id).await?;
        let record = decode_bytes(&raw, transaction_id)?;
        debug!(
            channel = %self.name,
            tx_id = %transaction_id,
            function = %record.function_name(),
            "fetched transaction"
        );
        Ok(record)
    }

    /// Whether the transaction exists and decodes.
    ///
    /// Not-found errors become `false`; any other ledger failure is returned.
    pub async fn exists(&self, transaction_id: &str) -> LedgerResult<bool> {
        match self.get(transaction_id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(channel = %self.name, tx_id = %transaction_id, reason = %e, "transaction absent");
                Ok(false)
            }
            Err(e) => {
                warn!(channel = %self.name, tx_id = %transaction_id, error = %e, "ledger lookup failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("name", &self.name).finish()
    }
}
