//! Genesis import and export of group records.
//!
//! Genesis groups are created in order through the normal creation path, so
//! the i-th group receives sequence number i. A group may therefore refer to
//! any group listed before it.

use serde::{Deserialize, Serialize};

use quorum_store::{AccountRegistry, KvStore, ReadTxn, WriteTxn};
use quorum_types::{Group, GroupId};

use crate::allocator;
use crate::registry::{load_group, GroupKeeper};
use crate::GroupError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl<A: AccountRegistry> GroupKeeper<A> {
    /// Create every genesis group inside `txn`.
    ///
    /// Refuses to run once any group id has been allocated.
    pub fn init_genesis<T: WriteTxn + ?Sized>(
        &self,
        txn: &mut T,
        genesis: &GenesisState,
    ) -> Result<Vec<GroupId>, GroupError> {
        let allocated = allocator::next_seq(&*txn)?;
        if allocated != 0 {
            return Err(GroupError::AlreadyInitialized(allocated));
        }

        let mut ids = Vec::with_capacity(genesis.groups.len());
        for group in &genesis.groups {
            ids.push(self.create_group(txn, group.clone())?);
        }
        tracing::info!(groups = ids.len(), "imported genesis groups");
        Ok(ids)
    }

    /// Import genesis in a single transaction, committing only if every group
    /// was created.
    pub fn apply_genesis<S: KvStore>(
        &self,
        store: &S,
        genesis: &GenesisState,
    ) -> Result<Vec<GroupId>, GroupError> {
        let mut txn = store.write_txn()?;
        let ids = self.init_genesis(&mut txn, genesis)?;
        txn.commit()?;
        Ok(ids)
    }

    /// Every stored group in allocation order.
    pub fn export_genesis<T: ReadTxn + ?Sized>(&self, txn: &T) -> Result<GenesisState, GroupError> {
        let next = allocator::next_seq(txn)?;
        let mut groups = Vec::new();
        for seq in 0..next {
            let id = GroupId::from_seq(seq);
            let group = load_group(txn, &id)?.ok_or_else(|| {
                GroupError::Store(quorum_store::StoreError::Corruption(format!(
                    "allocated group {id} has no record"
                )))
            })?;
            groups.push(group);
        }
        Ok(GenesisState { groups })
    }
}
