use std::sync::Arc;

use fabassert_crypto::build_composite_key;
use fabassert_state::{Collection, KeyValue};
use serde_json::Value;
use tracing::debug;

use crate::chain::Chain;
use crate::error::{AssertError, AssertResult};
use crate::message::display_key;
use crate::predicates::keyvalue::check_value;

impl Chain<Collection> {
    /// Select the value stored under `key` as the operand of the following
    /// predicates. Negated, passes when the key is absent.
    pub fn key(self, key: &str) -> Self {
        let key = key.to_string();
        let found = format!("Key {} found", display_key(&key));
        self.producer(found, move |collection| async move { lookup(&collection, &key).await })
    }

    pub fn composite_key<A: AsRef<str>>(self, object_type: &str, attributes: &[A]) -> Self {
        match composite(object_type, attributes) {
            Ok(key) => self.key(&key),
            Err(error) => self.producer(String::new(), move |_| async move { Err(error) }),
        }
    }

    /// The key exists and its value equals `expected`.
    ///
    /// Existence is always required; negation applies to the comparison only.
    pub fn key_with_value(self, key: &str, expected: impl Into<Value>) -> Self {
        let key = key.to_string();
        let expected = expected.into();
        self.standalone(move |collection, m| async move {
            let kv = lookup(&collection, &key).await?;
            check_value(&kv, m, &expected)
        })
    }

    pub fn composite_key_with_value<A: AsRef<str>>(
        self,
        object_type: &str,
        attributes: &[A],
        expected: impl Into<Value>,
    ) -> Self {
        match composite(object_type, attributes) {
            Ok(key) => self.key_with_value(&key, expected),
            Err(error) => self.standalone(move |_, _| async move { Err(error) }),
        }
    }
}

fn composite<A: AsRef<str>>(object_type: &str, attributes: &[A]) -> AssertResult<String> {
    build_composite_key(object_type, attributes).map_err(|e| AssertError::InvalidArgument(e.to_string()))
}

async fn lookup(collection: &Arc<Collection>, key: &str) -> AssertResult<KeyValue> {
    match collection.get(key).await {
        Ok(kv) => Ok(kv),
        Err(e) if e.is_not_found() => {
            debug!(database = %collection.database(), key = %key.escape_debug(), "key absent");
            Err(AssertError::NotFound(format!("Key {} not found", display_key(key))))
        }
        Err(e) => Err(AssertError::Unavailable(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use fabassert_state::{DocumentStore, InMemoryDocumentStore, StateResult, StoredValue};
    use serde_json::json;

    use super::*;
    use crate::config::ChainConfig;

    /// Counts value reads before delegating to an in-memory store.
    struct CountingStore {
        inner: InMemoryDocumentStore,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn databases(&self) -> StateResult<Vec<String>> {
            self.inner.databases().await
        }

        async fn get_value(&self, database: &str, key: &str) -> StateResult<StoredValue> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_value(database, key).await
        }
    }

    const DB: &str = "mychannel_assertion-contract";

    fn chain() -> (Arc<InMemoryDocumentStore>, Chain<Collection>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.put(DB, "k1", StoredValue::raw("100"));
        store.put(
            DB,
            "\u{0}asset\u{0}a1\u{0}",
            StoredValue::document(json!({"_id": "a1", "_rev": "1-x", "owner": "alice"})),
        );
        let collection = Collection::new(store.clone(), DB);
        (store, Chain::new(collection, ChainConfig::default()))
    }

    // -----------------------------------------------------------------------
    // 1. Key producers
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn key_then_value() {
        let (_, chain) = chain();
        assert_eq!(chain.key("k1").with().value("100").await, Ok(()));
    }

    #[tokio::test]
    async fn missing_key_fails_dependents() {
        let (_, chain) = chain();
        let result = chain.key("k9").with().value("100").await;
        assert_eq!(
            result,
            Err(AssertError::dependency_failed(AssertError::NotFound(
                "Key k9 not found".into()
            )))
        );
    }

    #[tokio::test]
    async fn negated_key() {
        let (_, chain1) = chain();
        assert_eq!(chain1.not().key("k9").await, Ok(()));
        let (_, chain2) = chain();
        assert_eq!(
            chain2.not().key("k1").await,
            Err(AssertError::failed("Key k1 found"))
        );
    }

    #[tokio::test]
    async fn composite_key_strips_bookkeeping_fields() {
        let (_, chain) = chain();
        let result = chain
            .composite_key("asset", &["a1"])
            .which()
            .has()
            .value(json!({"owner": "alice"}))
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn composite_key_messages_escape_separators() {
        let (_, chain) = chain();
        let result = chain.not().composite_key("asset", &["a1"]).await;
        assert_eq!(
            result,
            Err(AssertError::failed("Key \\u{0}asset\\u{0}a1\\u{0} found"))
        );
    }

    #[tokio::test]
    async fn invalid_composite_key_is_rejected() {
        let (_, chain) = chain();
        let result = chain.composite_key("", &["a1"]).value("x").await;
        assert!(matches!(
            result.unwrap_err().root_cause(),
            AssertError::InvalidArgument(_)
        ));
    }

    // -----------------------------------------------------------------------
    // 2. Key with value
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn key_with_value_compares() {
        let (_, chain1) = chain();
        assert_eq!(chain1.key_with_value("k1", "100").await, Ok(()));
        let (_, chain2) = chain();
        let err = chain2.key_with_value("k1", "200").await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Value at k1 does not equal expected value"));
    }

    #[tokio::test]
    async fn negation_applies_to_the_comparison_only() {
        let (_, chain1) = chain();
        assert_eq!(chain1.not().key_with_value("k1", "200").await, Ok(()));
        let (_, chain2) = chain();
        assert_eq!(
            chain2.not().key_with_value("k9", "200").await,
            Err(AssertError::NotFound("Key k9 not found".into()))
        );
    }

    #[tokio::test]
    async fn composite_key_with_value() {
        let (_, chain) = chain();
        let result = chain
            .composite_key_with_value("asset", &["a1"], json!({"owner": "alice"}))
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn key_with_value_does_not_touch_the_slot() {
        let (store, chain) = chain();
        store.put(DB, "k2", StoredValue::raw("7"));
        let result = chain
            .key("k1")
            .and()
            .key_with_value("k2", "7")
            .and()
            .value("100")
            .await;
        assert_eq!(result, Ok(()));
    }

    // -----------------------------------------------------------------------
    // 3. Ordering against producers
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn missing_key_is_not_hidden_by_a_later_value_check() {
        let inner = InMemoryDocumentStore::new();
        inner.put(DB, "k1", StoredValue::raw("100"));
        let store = Arc::new(CountingStore {
            inner,
            reads: AtomicUsize::new(0),
        });
        let result = Chain::new(Collection::new(store.clone(), DB), ChainConfig::default())
            .key("k9")
            .and()
            .key_with_value("k1", "999")
            .await;
        assert_eq!(
            result.unwrap_err().root_cause(),
            &AssertError::NotFound("Key k9 not found".into())
        );
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }
}
