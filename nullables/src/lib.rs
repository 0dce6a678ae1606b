//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The persistent store is abstracted behind traits; this crate provides a
//! test-friendly implementation that:
//! - Returns deterministic values
//! - Can be told to fail writes, to exercise rollback paths
//! - Never touches the filesystem
//!
//! Usage: swap the LMDB backend for [`NullStore`] in tests.

pub mod store;

pub use store::{NullReadTxn, NullStore, NullWriteTxn};
