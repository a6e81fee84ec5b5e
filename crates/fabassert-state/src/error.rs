use fabassert_crypto::CompositeKeyError;

/// Errors from state database lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("key {0} not found")]
    NotFound(String),

    #[error("database {0} not found")]
    DatabaseNotFound(String),

    #[error("world state does not exist in state database for chaincode {chaincode} in channel {channel}")]
    WorldStateNotFound { channel: String, chaincode: String },

    #[error(
        "collection with name {collection} does not exist in state database for chaincode {chaincode} in channel {channel}"
    )]
    CollectionNotFound {
        channel: String,
        chaincode: String,
        collection: String,
    },

    #[error(transparent)]
    CompositeKey(#[from] CompositeKeyError),

    #[error("state database unavailable: {0}")]
    Unavailable(String),
}

impl StateError {
    /// Returns `true` when the key or its database is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::DatabaseNotFound(_))
    }
}

/// Result alias for state database operations.
pub type StateResult<T> = Result<T, StateError>;
