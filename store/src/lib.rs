//! Abstract storage traits for quorum groups.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits and reads and
//! writes through an explicit transaction handle, so a caller controls exactly
//! which effects commit together.

pub mod account;
pub mod codec;
pub mod error;
pub mod keys;

pub use account::{AccountRegistry, KvAccountRegistry};
pub use error::StoreError;

/// Read access to an isolated snapshot of the key-value store.
pub trait ReadTxn {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Writable transaction handle (extends ReadTxn).
///
/// Writes become visible to other transactions only after [`WriteTxn::commit`].
/// Dropping the handle without committing discards every write made through it.
pub trait WriteTxn: ReadTxn {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// A store that hands out transactions.
pub trait KvStore {
    type Read<'a>: ReadTxn
    where
        Self: 'a;
    type Write<'a>: WriteTxn
    where
        Self: 'a;

    fn read_txn(&self) -> Result<Self::Read<'_>, StoreError>;

    fn write_txn(&self) -> Result<Self::Write<'_>, StoreError>;
}
