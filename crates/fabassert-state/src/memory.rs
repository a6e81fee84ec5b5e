use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{StateError, StateResult};
use crate::traits::DocumentStore;
use crate::value::StoredValue;

/// In-memory document store for tests.
///
/// Databases are created on first write.
pub struct InMemoryDocumentStore {
    databases: RwLock<BTreeMap<String, HashMap<String, StoredValue>>>,
    lists: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            databases: RwLock::new(BTreeMap::new()),
            lists: AtomicUsize::new(0),
        }
    }

    pub fn create_database(&self, database: &str) {
        self.databases
            .write()
            .expect("lock poisoned")
            .entry(database.to_string())
            .or_default();
    }

    pub fn put(&self, database: &str, key: &str, value: StoredValue) {
        self.databases
            .write()
            .expect("lock poisoned")
            .entry(database.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn delete(&self, database: &str, key: &str) -> bool {
        self.databases
            .write()
            .expect("lock poisoned")
            .get_mut(database)
            .and_then(|db| db.remove(key))
            .is_some()
    }

    /// Number of `databases()` calls served.
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn databases(&self) -> StateResult<Vec<String>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let map = self.databases.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    async fn get_value(&self, database: &str, key: &str) -> StateResult<StoredValue> {
        let map = self.databases.read().expect("lock poisoned");
        let db = map
            .get(database)
            .ok_or_else(|| StateError::DatabaseNotFound(database.to_string()))?;
        db.get(key)
            .cloned()
            .ok_or_else(|| StateError::NotFound(key.to_string()))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.databases.read().expect("lock poisoned");
        f.debug_struct("InMemoryDocumentStore")
            .field("databases", &map.keys().collect::<Vec<_>>())
            .finish()
    }
}
