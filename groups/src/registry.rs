//! Group registry: persist and resolve group records.

use quorum_store::codec::{decode, encode};
use quorum_store::{
    keys, AccountRegistry, KvAccountRegistry, KvStore, ReadTxn, StoreError, WriteTxn,
};
use quorum_types::{Address, AuthParams, Group, GroupAccount, GroupId, Principal};

use crate::allocator;
use crate::meter::GasMeter;
use crate::validate::{check_acyclic, check_nesting, check_nesting_after_update, check_record};
use crate::GroupError;

/// Owns group persistence and authorization over a shared key-value space.
///
/// Every operation takes the caller's transaction; the keeper itself holds no
/// mutable state.
#[derive(Clone, Debug)]
pub struct GroupKeeper<A = KvAccountRegistry> {
    accounts: A,
    params: AuthParams,
}

impl GroupKeeper<KvAccountRegistry> {
    pub fn new(params: AuthParams) -> Self {
        Self::with_accounts(KvAccountRegistry, params)
    }
}

impl Default for GroupKeeper<KvAccountRegistry> {
    fn default() -> Self {
        Self::new(AuthParams::default())
    }
}

impl<A: AccountRegistry> GroupKeeper<A> {
    pub fn with_accounts(accounts: A, params: AuthParams) -> Self {
        Self { accounts, params }
    }

    pub fn params(&self) -> &AuthParams {
        &self.params
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    /// Look up a group record.
    pub fn get_group<T: ReadTxn + ?Sized>(
        &self,
        txn: &T,
        id: &Address,
    ) -> Result<Group, GroupError> {
        let id = GroupId::try_from(id)?;
        load_group(txn, &id)?.ok_or_else(|| GroupError::NotFound(id.to_string()))
    }

    /// Create a group and its principal inside `txn`.
    ///
    /// Every check runs before the first write. If this returns an error the
    /// caller must drop `txn` rather than commit it.
    pub fn create_group<T: WriteTxn + ?Sized>(
        &self,
        txn: &mut T,
        info: Group,
    ) -> Result<GroupId, GroupError> {
        check_record(&info, &self.params)?;

        let id = allocator::peek_next(&*txn)?;
        check_acyclic(&*txn, &id, id.seq(), &info)?;
        check_nesting(&*txn, &info, self.params.max_depth)?;

        if self.accounts.get_account(&*txn, id.as_address())?.is_some() {
            tracing::error!(
                group = %id,
                seq = id.seq(),
                "account already exists at freshly allocated group id; \
                 allocator and account registry are out of sync"
            );
            return Err(GroupError::AlreadyExists(id.to_string()));
        }

        let allocated = allocator::allocate_next(txn)?;
        debug_assert_eq!(allocated, id);
        store_group(txn, &allocated, &info)?;
        self.accounts
            .set_account(txn, &Principal::Group(GroupAccount::new(&allocated)))?;

        tracing::info!(
            group = %allocated,
            seq = allocated.seq(),
            members = info.members.len(),
            threshold = %info.decision_threshold,
            "created group"
        );
        Ok(allocated)
    }

    /// Create a group in a transaction of its own, committing only on success.
    pub fn create_committed<S: KvStore>(
        &self,
        store: &S,
        info: Group,
    ) -> Result<GroupId, GroupError> {
        let mut txn = store.write_txn()?;
        let id = self.create_group(&mut txn, info)?;
        txn.commit()?;
        Ok(id)
    }

    /// Replace a group's record, authorized by the group itself.
    ///
    /// `signers` must satisfy the group's current threshold. The new record
    /// passes the same checks as a freshly created one, with `id` as the root
    /// of the cycle walk, and every group containing it must stay within the
    /// nesting limit. The group's principal entry is left as is.
    pub fn update_group<T, M>(
        &self,
        txn: &mut T,
        meter: &mut M,
        id: &Address,
        signers: &[Address],
        info: Group,
    ) -> Result<(), GroupError>
    where
        T: WriteTxn + ?Sized,
        M: GasMeter + ?Sized,
    {
        let id = GroupId::try_from(id)?;
        if load_group(&*txn, &id)?.is_none() {
            return Err(GroupError::NotFound(id.to_string()));
        }
        if !self.authorize(&*txn, meter, id.as_address(), signers)? {
            return Err(GroupError::Unauthorized(id.to_string()));
        }

        check_record(&info, &self.params)?;
        let next_seq = allocator::next_seq(&*txn)?;
        check_acyclic(&*txn, &id, next_seq, &info)?;
        check_nesting_after_update(&*txn, &id, &info, next_seq, self.params.max_depth)?;
        store_group(txn, &id, &info)?;

        tracing::info!(
            group = %id,
            members = info.members.len(),
            threshold = %info.decision_threshold,
            "updated group"
        );
        Ok(())
    }
}

/// Read and decode a group record, if present.
pub(crate) fn load_group<T: ReadTxn + ?Sized>(
    txn: &T,
    id: &GroupId,
) -> Result<Option<Group>, StoreError> {
    txn.get(&keys::group_key(id))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

fn store_group<T: WriteTxn + ?Sized>(
    txn: &mut T,
    id: &GroupId,
    info: &Group,
) -> Result<(), StoreError> {
    txn.put(&keys::group_key(id), &encode(info)?)
}
