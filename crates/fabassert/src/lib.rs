//! Fluent, awaitable test assertions over Hyperledger Fabric transactions
//! and the state database.
//!
//! This is the main entry point for test suites. [`expect`] starts a chain
//! from a channel, a decoded transaction, a state collection or a stored
//! key-value pair; the chain is checked when awaited.
//!
//! ```ignore
//! use fabassert::prelude::*;
//!
//! expect(channel.clone())
//!     .to()
//!     .have()
//!     .transaction(&tx_id)
//!     .which()
//!     .does()
//!     .only()
//!     .write_to(["org1Collection", "org2Collection"])
//!     .await?;
//!
//! expect(world_state)
//!     .key("k1")
//!     .with()
//!     .value("100")
//!     .await?;
//! ```

pub mod config;
pub mod error;

pub use config::{AssertConfig, ChainSection};
pub use error::{ConfigError, ConfigResult};

pub use fabassert_chain::{
    AssertError, AssertResult, Chain, ChainConfig, Direction, Modifiers, Subject, DEFAULT_MAX_WAIT,
};
pub use fabassert_crypto::{build_composite_key, key_hash, split_composite_key, value_hash, KeyHashMatcher};
pub use fabassert_ledger::{Channel, InMemoryLedger, LedgerError, LedgerQuery, TransactionBuilder};
pub use fabassert_state::{
    Collection, DocumentStore, InMemoryDocumentStore, KeyValue, StateDatabase, StateDatabaseConfig,
    StateError, StoredValue,
};
pub use fabassert_types::TransactionRecord;

/// Start a chain on `subject` with the default [`ChainConfig`].
pub fn expect<S: Subject>(subject: S) -> Chain<S> {
    Chain::new(subject, ChainConfig::default())
}

pub mod prelude {
    pub use crate::{expect, AssertConfig, AssertError, AssertResult, Chain};
    pub use fabassert_ledger::Channel;
    pub use fabassert_state::{Collection, KeyValue};
    pub use fabassert_types::TransactionRecord;
}
