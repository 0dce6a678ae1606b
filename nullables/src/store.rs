//! Nullable store: thread-safe in-memory key-value storage for testing.

use quorum_store::{KvStore, ReadTxn, StoreError, WriteTxn};
use std::collections::BTreeMap;
use std::sync::Mutex;

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// An in-memory ordered key-value store.
///
/// Write transactions buffer their changes and apply them on commit; dropping
/// one discards the buffer. Only one committed state exists, so the store
/// survives "restarts" simply by constructing new components around it.
pub struct NullStore {
    data: Mutex<Map>,
    /// Number of further `put` calls that succeed before puts start failing.
    put_budget: Mutex<Option<usize>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
            put_budget: Mutex::new(None),
        }
    }

    /// Make every `put` after the next `n` fail with a backend error.
    pub fn fail_puts_after(&self, n: usize) {
        *self.put_budget.lock().unwrap() = Some(n);
    }

    /// Stop injecting write failures.
    pub fn heal(&self) {
        *self.put_budget.lock().unwrap() = None;
    }

    /// Committed value for `key`, bypassing transactions.
    pub fn committed(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.lock().unwrap().get(key).cloned()
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_put_permit(&self) -> Result<(), StoreError> {
        let mut budget = self.put_budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => Err(StoreError::Backend("injected write failure".into())),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read transaction over a snapshot taken when the transaction began.
pub struct NullReadTxn {
    snapshot: Map,
}

impl ReadTxn for NullReadTxn {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.snapshot.get(key).cloned())
    }
}

/// Write transaction buffering changes until commit.
pub struct NullWriteTxn<'a> {
    store: &'a NullStore,
    snapshot: Map,
    /// `None` marks a pending delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl ReadTxn for NullWriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.pending.get(key) {
            Some(value) => Ok(value.clone()),
            None => Ok(self.snapshot.get(key).cloned()),
        }
    }
}

impl WriteTxn for NullWriteTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.store.take_put_permit()?;
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut data = self.store.data.lock().unwrap();
        for (key, value) in self.pending {
            match value {
                Some(v) => {
                    data.insert(key, v);
                }
                None => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

impl KvStore for NullStore {
    type Read<'a> = NullReadTxn;
    type Write<'a> = NullWriteTxn<'a>;

    fn read_txn(&self) -> Result<Self::Read<'_>, StoreError> {
        Ok(NullReadTxn {
            snapshot: self.data.lock().unwrap().clone(),
        })
    }

    fn write_txn(&self) -> Result<Self::Write<'_>, StoreError> {
        Ok(NullWriteTxn {
            store: self,
            snapshot: self.data.lock().unwrap().clone(),
            pending: BTreeMap::new(),
        })
    }
}
