//! Group id allocation from the persisted counter.

use quorum_store::codec::{decode_counter, encode_counter};
use quorum_store::{keys, ReadTxn, WriteTxn};
use quorum_types::GroupId;

use crate::GroupError;

/// Sequence number the next allocation will use. Zero on a fresh store.
pub fn next_seq<T: ReadTxn + ?Sized>(txn: &T) -> Result<u64, GroupError> {
    match txn.get(keys::NEXT_GROUP_SEQ)? {
        Some(bytes) => Ok(decode_counter(&bytes)?),
        None => Ok(0),
    }
}

/// The identifier the next allocation would return, without allocating it.
pub fn peek_next<T: ReadTxn + ?Sized>(txn: &T) -> Result<GroupId, GroupError> {
    Ok(GroupId::from_seq(next_seq(txn)?))
}

/// Allocate a fresh group identifier and advance the counter.
///
/// Identifiers are strictly increasing and never reused as long as the
/// transaction commits. Sequence `u64::MAX` is never issued: allocating it
/// would leave no representable next value, so the counter reports
/// exhaustion instead of wrapping to zero.
pub fn allocate_next<T: WriteTxn + ?Sized>(txn: &mut T) -> Result<GroupId, GroupError> {
    let seq = next_seq(&*txn)?;
    let next = seq.checked_add(1).ok_or(GroupError::CounterOverflow)?;
    txn.put(keys::NEXT_GROUP_SEQ, &encode_counter(next))?;
    Ok(GroupId::from_seq(seq))
}
