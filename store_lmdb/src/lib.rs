//! LMDB storage backend for quorum groups.
//!
//! Implements the transaction traits from `quorum-store` using the `heed` LMDB
//! bindings. The whole key space lives in one named database, so a single LMDB
//! write transaction covers the allocator counter, group records and principal
//! entries together.

pub mod environment;
pub mod error;
pub mod txn;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use txn::{LmdbReadTxn, LmdbWriteTxn};
