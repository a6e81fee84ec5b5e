use async_trait::async_trait;

use crate::error::StateResult;
use crate::value::StoredValue;

/// Document store backing a peer's state database.
///
/// Implementations must report a missing key as [`StateError::NotFound`]
/// and a missing database as [`StateError::DatabaseNotFound`], so that
/// existence checks can tell absence apart from an outage.
///
/// [`StateError::NotFound`]: crate::StateError::NotFound
/// [`StateError::DatabaseNotFound`]: crate::StateError::DatabaseNotFound
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of every database in the store.
    async fn databases(&self) -> StateResult<Vec<String>>;

    /// Read the value under `key`, attachment first, then document.
    async fn get_value(&self, database: &str, key: &str) -> StateResult<StoredValue>;
}
