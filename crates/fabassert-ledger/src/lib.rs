//! Ledger access for fabassert.
//!
//! Turns the raw block that holds a transaction into a
//! [`TransactionRecord`](fabassert_types::TransactionRecord).
//!
//! # Layers
//!
//! - [`envelope`]: serde model of a decoded block, byte fields hex-encoded
//! - [`decoder`]: envelope → record, every structural gap reported as
//!   [`DecodeError::NotFound`]
//! - [`LedgerQuery`]: the async boundary to a peer; [`InMemoryLedger`]
//!   implements it for tests
//! - [`Channel`]: a named handle that fetches and decodes on every call
//! - [`TransactionBuilder`]: builds envelopes for simulated transactions

pub mod builder;
pub mod channel;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod traits;

pub use builder::TransactionBuilder;
pub use channel::Channel;
pub use decoder::{decode, decode_bytes};
pub use envelope::{Block, Envelope, HexBytes};
pub use error::{DecodeError, LedgerError, LedgerResult};
pub use memory::InMemoryLedger;
pub use traits::LedgerQuery;
