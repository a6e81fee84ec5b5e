/// Errors produced while turning an envelope into a transaction record.
///
/// Every structural problem is reported as `NotFound`: callers only need to
/// tell "found" from "not found", and the reason string keeps the detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("transaction {transaction_id} not found: {reason}")]
    NotFound {
        transaction_id: String,
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn not_found(transaction_id: &str, reason: impl Into<String>) -> Self {
        Self::NotFound {
            transaction_id: transaction_id.to_string(),
            reason: reason.into(),
        }
    }

    /// The transaction id the lookup was for.
    pub fn transaction_id(&self) -> &str {
        match self {
            Self::NotFound { transaction_id, .. } => transaction_id,
        }
    }
}

/// Errors produced by ledger queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("transaction {0} not found on ledger")]
    NotFound(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Returns `true` for the "transaction does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Decode(DecodeError::NotFound { .. }))
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
