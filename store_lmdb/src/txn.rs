//! Transaction handles over the shared LMDB database.
//!
//! If a [`LmdbWriteTxn`] is dropped without calling [`WriteTxn::commit`], all
//! of its writes are rolled back (the underlying LMDB transaction is aborted).

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use quorum_store::{ReadTxn, StoreError, WriteTxn};

use crate::LmdbError;

pub struct LmdbReadTxn<'a> {
    txn: RoTxn<'a>,
    db: Database<Bytes, Bytes>,
}

impl<'a> LmdbReadTxn<'a> {
    pub(crate) fn new(txn: RoTxn<'a>, db: Database<Bytes, Bytes>) -> Self {
        Self { txn, db }
    }
}

impl ReadTxn for LmdbReadTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let val = self.db.get(&self.txn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }
}

pub struct LmdbWriteTxn<'a> {
    txn: RwTxn<'a>,
    db: Database<Bytes, Bytes>,
}

impl<'a> LmdbWriteTxn<'a> {
    pub(crate) fn new(txn: RwTxn<'a>, db: Database<Bytes, Bytes>) -> Self {
        Self { txn, db }
    }
}

impl ReadTxn for LmdbWriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let val = self.db.get(&self.txn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }
}

impl WriteTxn for LmdbWriteTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db
            .put(&mut self.txn, key, value)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.db.delete(&mut self.txn, key).map_err(LmdbError::from)?;
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
