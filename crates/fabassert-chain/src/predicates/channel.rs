use fabassert_ledger::{Channel, LedgerError};
use tracing::debug;

use crate::chain::Chain;
use crate::error::AssertError;

impl Chain<Channel> {
    /// Select transaction `id` as the operand of the following predicates.
    ///
    /// Fails with `NotFound` when the ledger has no such transaction or it
    /// does not decode. Negated, it passes exactly in that case.
    pub fn transaction(self, id: &str) -> Self {
        let id = id.to_string();
        let found = format!("Transaction {id} found");
        self.producer(found, move |channel| async move {
            match channel.get(&id).await {
                Ok(record) => {
                    debug!(channel = %channel.name(), tx_id = %id, "selected transaction");
                    Ok(record)
                }
                Err(e) => Err(lookup_error(&id, e)),
            }
        })
    }
}

fn lookup_error(id: &str, error: LedgerError) -> AssertError {
    if error.is_not_found() {
        debug!(tx_id = %id, reason = %error, "transaction lookup missed");
        AssertError::NotFound(format!("Transaction {id} not found"))
    } else {
        AssertError::Unavailable(error.to_string())
    }
}
