use std::sync::Arc;

use fabassert_crypto::build_composite_key;
use tracing::{debug, warn};

use crate::error::StateResult;
use crate::traits::DocumentStore;
use crate::value::KeyValue;

/// Handle on one database of the state store: a channel's world state for
/// a chaincode, or one of its private collections.
#[derive(Clone)]
pub struct Collection {
    database: String,
    store: Arc<dyn DocumentStore>,
}

impl Collection {
    pub fn new(store: Arc<dyn DocumentStore>, database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            store,
        }
    }

    /// The state database name this handle reads from.
    pub fn database(&self) -> &str {
        &self.database
    }

    pub async fn get(&self, key: &str) -> StateResult<KeyValue> {
        let stored = self.store.get_value(&self.database, key).await?;
        debug!(database = %self.database, key = %key.escape_debug(), "read state value");
        Ok(KeyValue::new(key, stored.to_json()))
    }

    /// Whether `key` holds a value. Absence is `false`; outages are errors.
    pub async fn exists(&self, key: &str) -> StateResult<bool> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => {
                warn!(database = %self.database, error = %e, "state lookup failed");
                Err(e)
            }
        }
    }

    pub async fn get_composite<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> StateResult<KeyValue> {
        let key = build_composite_key(object_type, attributes)?;
        self.get(&key).await
    }

    pub async fn exists_composite<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> StateResult<bool> {
        let key = build_composite_key(object_type, attributes)?;
        self.exists(&key).await
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("database", &self.database)
            .finish()
    }
}
