//! Shared principal registry.

use quorum_types::{Address, Principal};

use crate::codec::{decode, encode};
use crate::keys::account_key;
use crate::{ReadTxn, StoreError, WriteTxn};

/// Account registry shared with the surrounding application.
///
/// Reads and writes go through the caller's transaction so that a group's
/// principal commits together with its group record.
pub trait AccountRegistry {
    fn get_account<T: ReadTxn + ?Sized>(
        &self,
        txn: &T,
        address: &Address,
    ) -> Result<Option<Principal>, StoreError>;

    fn set_account<T: WriteTxn + ?Sized>(
        &self,
        txn: &mut T,
        principal: &Principal,
    ) -> Result<(), StoreError>;
}

/// Registry that keeps principals under `acct/` in the same key-value space.
#[derive(Clone, Copy, Debug, Default)]
pub struct KvAccountRegistry;

impl AccountRegistry for KvAccountRegistry {
    fn get_account<T: ReadTxn + ?Sized>(
        &self,
        txn: &T,
        address: &Address,
    ) -> Result<Option<Principal>, StoreError> {
        txn.get(&account_key(address))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn set_account<T: WriteTxn + ?Sized>(
        &self,
        txn: &mut T,
        principal: &Principal,
    ) -> Result<(), StoreError> {
        txn.put(&account_key(principal.address()), &encode(principal)?)
    }
}
