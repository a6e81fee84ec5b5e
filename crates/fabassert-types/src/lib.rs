//! Foundation types for fabassert.
//!
//! This crate provides the immutable fact records that every other fabassert
//! crate reasons about. A [`TransactionRecord`] is built once per ledger
//! lookup and is never mutated afterwards.
//!
//! # Key Types
//!
//! - [`TransactionRecord`]: Structured, queryable view of one ledger transaction
//! - [`RecordParts`]: Owned field bundle used to assemble a record
//! - [`ChaincodeEvent`]: Event emitted by the chaincode, if any
//! - [`TxResponse`]: Execution response (status, message, payload)
//! - [`KeyHash`] / [`ValueHash`]: One-way digests from private-collection rw-sets

pub mod error;
pub mod hash;
pub mod record;

pub use error::TypeError;
pub use hash::{KeyHash, ValueHash, DIGEST_LEN};
pub use record::{ChaincodeEvent, RecordParts, TransactionRecord, TxResponse};
