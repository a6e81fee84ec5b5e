//! State database access for fabassert.
//!
//! A peer keeps world state and private collection data in a document
//! store, one database per channel/chaincode(/collection). This crate
//! names those databases, hands out [`Collection`] handles over them, and
//! cleans stored values into the JSON a chaincode wrote.
//!
//! The store itself sits behind [`DocumentStore`]; [`InMemoryDocumentStore`]
//! implements it for tests.

pub mod collection;
pub mod database;
pub mod error;
pub mod memory;
pub mod traits;
pub mod value;

pub use collection::Collection;
pub use database::{Login, StateDatabase, StateDatabaseConfig};
pub use error::{StateError, StateResult};
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
pub use value::{KeyValue, StoredValue};
