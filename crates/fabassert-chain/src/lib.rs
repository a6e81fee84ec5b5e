//! Chained assertions for fabassert.
//!
//! A [`Chain`] starts from a subject (a [`Channel`](fabassert_ledger::Channel),
//! a [`TransactionRecord`](fabassert_types::TransactionRecord), a state
//! [`Collection`](fabassert_state::Collection) or a
//! [`KeyValue`](fabassert_state::KeyValue)), collects predicate steps, and
//! runs them when awaited:
//!
//! ```ignore
//! Chain::new(channel, ChainConfig::default())
//!     .transaction(&tx_id)
//!     .which()
//!     .has()
//!     .function_and_parameters("createKeyValue", ["k1", "100"])
//!     .and()
//!     .does()
//!     .not()
//!     .write_to(["org1Collection"])
//!     .await?;
//! ```
//!
//! # Key Types
//!
//! - [`Chain`]: the awaitable builder; predicates live in [`predicates`]
//! - [`Modifiers`]: `not`/`only`/`read`/`write`, cleared by each predicate
//! - [`ChainSlot`]: the operand cell producers write and consumers wait on
//! - [`AssertError`]: every failure, with the human-readable message as `Display`

pub mod chain;
pub mod config;
pub mod error;
mod message;
pub mod modifiers;
pub mod predicates;
pub mod slot;

pub use chain::{Chain, Subject};
pub use config::{ChainConfig, DEFAULT_MAX_WAIT};
pub use error::{AssertError, AssertResult};
pub use modifiers::{Direction, Modifiers};
pub use slot::{ChainFlag, ChainSlot, SlotWriter};
