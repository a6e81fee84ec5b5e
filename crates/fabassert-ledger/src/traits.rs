use async_trait::async_trait;

use crate::error::LedgerResult;

/// Read access to the blocks of one channel.
///
/// Implementations return the raw JSON rendering of the block containing
/// `transaction_id`. Failures are returned, never retried; the decoder turns
/// whatever bytes come back into a record or a `NotFound`.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch the raw block that holds `transaction_id`.
    async fn fetch_envelope(&self, transaction_id: &str) -> LedgerResult<Vec<u8>>;
}
