//! Read/write-set predicates: private collections, keys, and world state.

use std::collections::BTreeSet;

use fabassert_crypto::{build_composite_key, KeyHashMatcher};
use fabassert_types::{KeyHash, TransactionRecord};

use crate::chain::{Chain, Subject};
use crate::error::{AssertError, AssertResult};
use crate::message::{transaction_failure, verdict};
use crate::modifiers::{Direction, Modifiers};

impl<S> Chain<S>
where
    S: Subject<Operand = TransactionRecord>,
{
    /// The transaction wrote to every named private collection.
    ///
    /// Negated, it wrote to none of them. With `only()`, the named
    /// collections are exactly the ones written.
    pub fn write_to<I, N>(self, collections: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names = collect_names(collections);
        self.consumer(move |record, m| check_collections(record, m, Direction::Write, &names))
    }

    /// Read-side counterpart of [`write_to`](Self::write_to).
    pub fn read_from<I, N>(self, collections: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names = collect_names(collections);
        self.consumer(move |record, m| check_collections(record, m, Direction::Read, &names))
    }

    /// The transaction wrote `key` in every named collection, or in world
    /// state when no collection is named.
    pub fn write_to_key<I, N>(self, key: &str, collections: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let key = key.to_string();
        let names = collect_names(collections);
        self.consumer(move |record, m| check_key(record, m, Direction::Write, &key, &names))
    }

    pub fn read_from_key<I, N>(self, key: &str, collections: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let key = key.to_string();
        let names = collect_names(collections);
        self.consumer(move |record, m| check_key(record, m, Direction::Read, &key, &names))
    }

    pub fn write_to_composite_key<A, I, N>(self, object_type: &str, attributes: &[A], collections: I) -> Self
    where
        A: AsRef<str>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let key = composite(object_type, attributes);
        let names = collect_names(collections);
        self.consumer(move |record, m| check_key(record, m, Direction::Write, &key?, &names))
    }

    pub fn read_from_composite_key<A, I, N>(self, object_type: &str, attributes: &[A], collections: I) -> Self
    where
        A: AsRef<str>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let key = composite(object_type, attributes);
        let names = collect_names(collections);
        self.consumer(move |record, m| check_key(record, m, Direction::Read, &key?, &names))
    }

    /// The transaction touched world state in the direction set by `read()`
    /// or `write()`.
    pub fn world_state(self) -> Self {
        self.consumer(check_world_state)
    }
}

fn collect_names<I, N>(collections: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    collections.into_iter().map(Into::into).collect()
}

fn composite<A: AsRef<str>>(object_type: &str, attributes: &[A]) -> AssertResult<String> {
    build_composite_key(object_type, attributes).map_err(|e| AssertError::InvalidArgument(e.to_string()))
}

fn touched_collections(record: &TransactionRecord, direction: Direction) -> BTreeSet<&str> {
    match direction {
        Direction::Write => record.written_collections().collect(),
        Direction::Read => record.read_collections().collect(),
    }
}

fn key_hashes<'a>(record: &'a TransactionRecord, direction: Direction, collection: &str) -> Vec<&'a KeyHash> {
    match direction {
        Direction::Write => record.written_key_hashes(collection).collect(),
        Direction::Read => record.read_key_hashes(collection).collect(),
    }
}

fn check_collections(
    record: &TransactionRecord,
    m: Modifiers,
    direction: Direction,
    names: &BTreeSet<String>,
) -> AssertResult<()> {
    if names.is_empty() {
        return Err(AssertError::InvalidArgument(
            "at least one collection name is required".into(),
        ));
    }

    let touched = touched_collections(record, direction);
    let present = names.iter().filter(|n| touched.contains(n.as_str())).count();
    let verb = match (direction, m.only) {
        (Direction::Write, false) => "write to collection",
        (Direction::Write, true) => "write only to collections",
        (Direction::Read, false) => "read from collection",
        (Direction::Read, true) => "read only from collections",
    };

    // Negated plain containment passes only when none of the names is present.
    let holds = if m.only {
        present == names.len() && touched.len() == names.len()
    } else if m.negate {
        present > 0
    } else {
        present == names.len()
    };

    verdict(m.accepts(holds), || {
        transaction_failure(
            record,
            m,
            verb,
            Some(format!("expected {names:?}, observed {touched:?}")),
        )
    })
}

fn check_key(
    record: &TransactionRecord,
    m: Modifiers,
    direction: Direction,
    key: &str,
    names: &BTreeSet<String>,
) -> AssertResult<()> {
    if names.is_empty() {
        return check_world_state_key(record, m, direction, key);
    }

    let (verb, exact_verb, collection_verb) = match direction {
        Direction::Write => ("write to key", "write only to key", "write to collection"),
        Direction::Read => ("read from key", "read only from key", "read from collection"),
    };
    let verb = if m.only { exact_verb } else { verb };
    let matcher = KeyHashMatcher::new(key);
    let hit = |collection: &str| {
        let hashes = key_hashes(record, direction, collection);
        if m.only {
            matcher.is_only(hashes)
        } else {
            matcher.is_in(hashes)
        }
    };

    if m.negate {
        return match names.iter().find(|name| hit(name.as_str())) {
            Some(name) => Err(transaction_failure(
                record,
                m,
                &format!("{verb} in collection {name}"),
                None,
            )),
            None => Ok(()),
        };
    }

    for name in names {
        if !touched_collections(record, direction).contains(name.as_str()) {
            return Err(transaction_failure(
                record,
                m,
                collection_verb,
                Some(format!("collection {name} not touched")),
            ));
        }
        if !hit(name.as_str()) {
            return Err(transaction_failure(
                record,
                m,
                &format!("{verb} in collection {name}"),
                None,
            ));
        }
    }
    Ok(())
}

fn check_world_state_key(
    record: &TransactionRecord,
    m: Modifiers,
    direction: Direction,
    key: &str,
) -> AssertResult<()> {
    let (holds, verb) = match (direction, m.only) {
        (Direction::Write, false) => (record.writes_public_key(key), "write to key in world state"),
        (Direction::Write, true) => (
            record.writes_public_key(key) && record.public_writes().iter().all(|(k, _)| k == key),
            "write only to key in world state",
        ),
        (Direction::Read, false) => (record.reads_public_key(key), "read from key in world state"),
        (Direction::Read, true) => (
            record.reads_public_key(key) && record.public_reads().len() == 1,
            "read only from key in world state",
        ),
    };
    verdict(m.accepts(holds), || transaction_failure(record, m, verb, None))
}

fn check_world_state(record: &TransactionRecord, m: Modifiers) -> AssertResult<()> {
    let (holds, verb) = match m.direction() {
        Some(Direction::Write) => (!record.public_writes().is_empty(), "write to world state"),
        Some(Direction::Read) => (!record.public_reads().is_empty(), "read from world state"),
        None => {
            return Err(AssertError::MissingContext(
                "world_state() needs read() or write() before it".into(),
            ))
        }
    };
    verdict(m.accepts(holds), || transaction_failure(record, m, verb, None))
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;
    use crate::config::ChainConfig;
    use crate::predicates::fixtures::{bare_record, record};

    fn chain(record: TransactionRecord) -> Chain<TransactionRecord> {
        Chain::new(record, ChainConfig::default())
    }

    fn message(result: AssertResult<()>) -> String {
        match result {
            Err(AssertError::PredicateFailed { message, .. }) => message,
            other => panic!("expected a predicate failure, got {other:?}"),
        }
    }

    const BOTH: [&str; 2] = ["org1Collection", "org2Collection"];

    // -----------------------------------------------------------------------
    // 1. Collection containment
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn writes_to_named_collections() {
        assert_eq!(chain(record()).to().write_to(["org1Collection"]).await, Ok(()));
        assert_eq!(chain(record()).write_to(BOTH).await, Ok(()));
        assert_eq!(
            message(chain(record()).write_to(["org1Collection", "org3Collection"]).await),
            "Transaction tx1 does not write to collection"
        );
    }

    #[tokio::test]
    async fn only_requires_the_exact_set() {
        assert_eq!(
            message(chain(record()).only().write_to(["org1Collection"]).await),
            "Transaction tx1 does not write only to collections"
        );
        assert_eq!(chain(record()).only().write_to(BOTH).await, Ok(()));
        assert_eq!(
            chain(record()).only().write_to(["org1Collection", "org1Collection", "org2Collection"]).await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn negated_containment_means_none_present() {
        assert_eq!(chain(record()).not().write_to(["org3Collection"]).await, Ok(()));
        assert_eq!(
            message(chain(record()).not().write_to(["org1Collection", "org3Collection"]).await),
            "Transaction tx1 does write to collection"
        );
    }

    #[tokio::test]
    async fn negated_only_fails_on_the_exact_set() {
        assert_eq!(chain(record()).not().only().write_to(["org1Collection"]).await, Ok(()));
        assert_eq!(
            message(chain(record()).not().only().write_to(BOTH).await),
            "Transaction tx1 does write only to collections"
        );
    }

    #[tokio::test]
    async fn reads_are_checked_separately() {
        assert_eq!(chain(record()).read_from(["org1Collection"]).await, Ok(()));
        assert_eq!(
            message(chain(record()).read_from(["org2Collection"]).await),
            "Transaction tx1 does not read from collection"
        );
        assert_eq!(chain(record()).only().read_from(["org1Collection"]).await, Ok(()));
    }

    #[tokio::test]
    async fn empty_collection_list_is_rejected() {
        let result = chain(record()).write_to(Vec::<String>::new()).await;
        assert!(matches!(result, Err(AssertError::InvalidArgument(_))));
    }

    // -----------------------------------------------------------------------
    // 2. Keys in collections
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn private_key_is_found_by_hash() {
        assert_eq!(chain(record()).write_to_key("secret", BOTH).await, Ok(()));
        assert_eq!(chain(record()).only().write_to_key("secret", BOTH).await, Ok(()));
        assert_eq!(
            message(chain(record()).write_to_key("public", ["org1Collection"]).await),
            "Transaction tx1 does not write to key in collection org1Collection"
        );
    }

    #[tokio::test]
    async fn untouched_collection_is_reported_before_the_key() {
        assert_eq!(
            message(chain(record()).read_from_key("secret", BOTH).await),
            "Transaction tx1 does not read from collection"
        );
        assert_eq!(
            chain(record()).read_from_key("secret", ["org1Collection"]).await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn negated_key_check_needs_absence_everywhere() {
        assert_eq!(chain(record()).not().write_to_key("other", BOTH).await, Ok(()));
        assert_eq!(
            message(chain(record()).not().write_to_key("secret", ["org3Collection", "org2Collection"]).await),
            "Transaction tx1 does write to key in collection org2Collection"
        );
    }

    #[tokio::test]
    async fn composite_keys_are_built_before_hashing() {
        let result = chain(record())
            .write_to_composite_key("asset", &["a1"], ["org1Collection"])
            .await;
        assert_eq!(
            message(result),
            "Transaction tx1 does not write to key in collection org1Collection"
        );

        let result = chain(record())
            .write_to_composite_key("", &["a1"], ["org1Collection"])
            .await;
        assert!(matches!(result, Err(AssertError::InvalidArgument(_))));
    }

    // -----------------------------------------------------------------------
    // 3. World state
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn world_state_key_without_collections() {
        assert_eq!(chain(record()).write_to_key("k1", iter::empty::<&str>()).await, Ok(()));
        assert_eq!(chain(record()).only().write_to_key("k1", iter::empty::<&str>()).await, Ok(()));
        assert_eq!(chain(record()).read_from_key("k0", iter::empty::<&str>()).await, Ok(()));
        assert_eq!(
            message(chain(record()).write_to_key("k0", iter::empty::<&str>()).await),
            "Transaction tx1 does not write to key in world state"
        );
    }

    #[tokio::test]
    async fn world_state_follows_the_direction_modifier() {
        assert_eq!(chain(record()).write().world_state().await, Ok(()));
        assert_eq!(chain(record()).read().world_state().await, Ok(()));
        assert_eq!(chain(bare_record()).not().write().world_state().await, Ok(()));
        assert_eq!(
            message(chain(bare_record()).write().world_state().await),
            "Transaction tx2 does not write to world state"
        );
    }

    #[tokio::test]
    async fn world_state_without_direction_is_missing_context() {
        let result = chain(record()).world_state().await;
        assert!(matches!(result, Err(AssertError::MissingContext(_))));
    }

    #[tokio::test]
    async fn direction_is_cleared_after_use() {
        let result = chain(record()).write().world_state().and().world_state().await;
        assert!(matches!(result, Err(AssertError::MissingContext(_))));
    }
}
