//! Structural checks applied before a group record is written.

use std::collections::{HashMap, HashSet};

use quorum_store::ReadTxn;
use quorum_types::{AuthParams, Group, GroupId};

use crate::registry::load_group;
use crate::GroupError;

/// Reject records that could never be evaluated safely.
pub(crate) fn check_record(info: &Group, params: &AuthParams) -> Result<(), GroupError> {
    if info.members.iter().any(|m| m.address.is_empty()) {
        return Err(GroupError::InvalidGroup("member address is empty".into()));
    }
    let total = info
        .total_weight()
        .ok_or_else(|| GroupError::InvalidGroup("member weights overflow".into()))?;
    if info.decision_threshold == 0 && !params.allow_zero_threshold {
        return Err(GroupError::InvalidGroup(
            "decision threshold must be positive".into(),
        ));
    }
    if info.decision_threshold > total {
        tracing::warn!(
            threshold = %info.decision_threshold,
            total_weight = %total,
            "group threshold exceeds total member weight; it can never authorize"
        );
    }
    Ok(())
}

/// Walk the sub-groups reachable from `members` and reject any back edge.
///
/// A back edge is a reference to `root` itself or to a group identifier at or
/// beyond `next_seq`, which is not allocated yet and could later be created
/// pointing back at `root`.
pub(crate) fn check_acyclic<T: ReadTxn + ?Sized>(
    txn: &T,
    root: &GroupId,
    next_seq: u64,
    info: &Group,
) -> Result<(), GroupError> {
    let mut visited = HashSet::new();
    let mut pending: Vec<GroupId> = info.subgroups().collect();

    while let Some(id) = pending.pop() {
        if id == *root {
            return Err(GroupError::CycleDetected(format!("{root} would contain itself")));
        }
        if id.seq() >= next_seq {
            return Err(GroupError::CycleDetected(format!(
                "member {id} refers to a group that has not been allocated"
            )));
        }
        if !visited.insert(id.seq()) {
            continue;
        }
        if let Some(group) = load_group(txn, &id)? {
            pending.extend(group.subgroups());
        }
    }
    Ok(())
}

/// Reject a new record whose sub-group hierarchy is deeper than `max_depth`,
/// which would make it impossible to evaluate.
pub(crate) fn check_nesting<T: ReadTxn + ?Sized>(
    txn: &T,
    info: &Group,
    max_depth: u32,
) -> Result<(), GroupError> {
    let mut heights = HashMap::new();
    subtree_height(txn, info, 0, max_depth, None, &mut heights)?;
    Ok(())
}

/// Like [`check_nesting`], for replacing the record of `id`.
///
/// Replacing a record can deepen every group that contains it, so all
/// allocated groups below `next_seq` are re-measured with `info` in place of
/// the stored record.
pub(crate) fn check_nesting_after_update<T: ReadTxn + ?Sized>(
    txn: &T,
    id: &GroupId,
    info: &Group,
    next_seq: u64,
    max_depth: u32,
) -> Result<(), GroupError> {
    let mut heights = HashMap::new();
    let replaced = Some((id, info));
    for seq in 0..next_seq {
        if heights.contains_key(&seq) {
            continue;
        }
        let current = GroupId::from_seq(seq);
        let loaded;
        let group = if current == *id {
            info
        } else {
            loaded = load_group(txn, &current)?;
            match &loaded {
                Some(group) => group,
                None => continue,
            }
        };
        let height = subtree_height(txn, group, 0, max_depth, replaced, &mut heights)?;
        heights.insert(seq, height);
    }
    Ok(())
}

/// Longest chain of stored sub-groups below `info`, evaluated at `depth`.
///
/// Fails as soon as a group would be reached deeper than `max_depth`. The
/// member graph must already be known to be acyclic.
fn subtree_height<T: ReadTxn + ?Sized>(
    txn: &T,
    info: &Group,
    depth: u32,
    max_depth: u32,
    replaced: Option<(&GroupId, &Group)>,
    heights: &mut HashMap<u64, u32>,
) -> Result<u32, GroupError> {
    let mut height = 0;
    for id in info.subgroups() {
        let cached = heights.get(&id.seq()).copied();
        let below = match cached {
            Some(h) => h,
            None => {
                let loaded;
                let child = match replaced {
                    Some((replaced_id, record)) if *replaced_id == id => record,
                    _ => {
                        loaded = load_group(txn, &id)?;
                        match &loaded {
                            Some(group) => group,
                            None => continue,
                        }
                    }
                };
                let h = subtree_height(txn, child, depth + 1, max_depth, replaced, heights)?;
                heights.insert(id.seq(), h);
                h
            }
        };
        height = height.max(below + 1);
        if depth + height > max_depth {
            return Err(GroupError::InvalidGroup(format!(
                "sub-groups nest deeper than the limit of {max_depth}"
            )));
        }
    }
    Ok(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_nullables::NullStore;
    use quorum_store::codec::encode;
    use quorum_store::{keys, KvStore, WriteTxn};
    use quorum_types::{Address, Member, Weight};

    fn member(bytes: &[u8], weight: Weight) -> Member {
        Member::new(Address::new(bytes.to_vec()), weight)
    }

    #[test]
    fn empty_member_address_is_rejected() {
        let info = Group::new(1, vec![member(&[], 1)]);
        assert!(matches!(
            check_record(&info, &AuthParams::default()),
            Err(GroupError::InvalidGroup(_))
        ));
    }

    #[test]
    fn overflowing_weights_are_rejected() {
        let info = Group::new(1, vec![member(&[1; 20], Weight::MAX), member(&[2; 20], 1)]);
        assert!(check_record(&info, &AuthParams::default()).is_err());
    }

    #[test]
    fn zero_threshold_follows_params() {
        let info = Group::new(0, vec![member(&[1; 20], 1)]);
        assert!(check_record(&info, &AuthParams::default()).is_ok());
        let strict = AuthParams {
            allow_zero_threshold: false,
            ..AuthParams::default()
        };
        assert!(check_record(&info, &strict).is_err());
    }

    #[test]
    fn unsatisfiable_threshold_is_allowed() {
        let info = Group::new(10, vec![member(&[1; 20], 1)]);
        assert!(check_record(&info, &AuthParams::default()).is_ok());
    }

    #[test]
    fn transitive_back_edge_is_found() {
        let store = NullStore::new();
        let mut txn = store.write_txn().unwrap();
        let g0 = GroupId::from_seq(0);
        let g1 = GroupId::from_seq(1);
        // g1 lists g0; proposing g0 := [g1] closes the loop.
        let g1_record = Group::new(1, vec![Member::new(g0.as_address().clone(), 1)]);
        txn.put(&keys::group_key(&g1), &encode(&g1_record).unwrap()).unwrap();

        let proposal = Group::new(1, vec![Member::new(g1.as_address().clone(), 1)]);
        assert!(matches!(
            check_acyclic(&txn, &g0, 2, &proposal),
            Err(GroupError::CycleDetected(_))
        ));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let store = NullStore::new();
        let mut txn = store.write_txn().unwrap();
        let leaf = GroupId::from_seq(0);
        let left = GroupId::from_seq(1);
        let right = GroupId::from_seq(2);
        for id in [&left, &right] {
            let record = Group::new(1, vec![Member::new(leaf.as_address().clone(), 1)]);
            txn.put(&keys::group_key(id), &encode(&record).unwrap()).unwrap();
        }
        let top = Group::new(
            2,
            vec![
                Member::new(left.as_address().clone(), 1),
                Member::new(right.as_address().clone(), 1),
            ],
        );
        assert!(check_acyclic(&txn, &GroupId::from_seq(3), 3, &top).is_ok());
    }

    #[test]
    fn unallocated_reference_is_rejected() {
        let store = NullStore::new();
        let txn = store.write_txn().unwrap();
        let ahead = GroupId::from_seq(5);
        let proposal = Group::new(1, vec![Member::new(ahead.into_address(), 1)]);
        assert!(check_acyclic(&txn, &GroupId::from_seq(0), 0, &proposal).is_err());
    }

    fn chain(txn: &mut impl WriteTxn, len: u64) {
        // Group 0 is a leaf; group n lists group n - 1.
        for seq in 0..len {
            let member = match seq {
                0 => member(&[1; 20], 1),
                _ => Member::new(GroupId::from_seq(seq - 1).into_address(), 1),
            };
            let record = Group::new(1, vec![member]);
            txn.put(&keys::group_key(&GroupId::from_seq(seq)), &encode(&record).unwrap())
                .unwrap();
        }
    }

    #[test]
    fn nesting_at_the_limit_is_accepted() {
        let store = NullStore::new();
        let mut txn = store.write_txn().unwrap();
        chain(&mut txn, 3);
        // On top of groups 2, 1, 0 the deepest group sits at depth 3.
        let top = Group::new(1, vec![Member::new(GroupId::from_seq(2).into_address(), 1)]);
        assert!(check_nesting(&txn, &top, 3).is_ok());
        assert!(matches!(
            check_nesting(&txn, &top, 2),
            Err(GroupError::InvalidGroup(_))
        ));
    }

    #[test]
    fn flat_record_has_no_nesting() {
        let store = NullStore::new();
        let txn = store.write_txn().unwrap();
        let flat = Group::new(1, vec![member(&[1; 20], 1)]);
        assert!(check_nesting(&txn, &flat, 0).is_ok());
    }

    #[test]
    fn update_deepening_an_ancestor_is_rejected() {
        let store = NullStore::new();
        let mut txn = store.write_txn().unwrap();
        chain(&mut txn, 3);
        let leaf = GroupId::from_seq(3);
        let record = Group::new(1, vec![member(&[2; 20], 1)]);
        txn.put(&keys::group_key(&leaf), &encode(&record).unwrap()).unwrap();

        // Group 0 gains a sub-group, so group 2 now reaches depth 3.
        let deeper = Group::new(1, vec![Member::new(leaf.into_address(), 1)]);
        let root = GroupId::from_seq(0);
        assert!(check_nesting_after_update(&txn, &root, &deeper, 4, 3).is_ok());
        assert!(matches!(
            check_nesting_after_update(&txn, &root, &deeper, 4, 2),
            Err(GroupError::InvalidGroup(_))
        ));
    }
}
