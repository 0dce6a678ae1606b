//! Weighted threshold authorization.
//!
//! A group is satisfied by a signer set when the weights of the members the
//! set covers add up to the group's decision threshold. A member is covered
//! when one of the signers is its exact address, or when the member is itself
//! a group that the same signer set satisfies. Nested groups are evaluated with
//! this same procedure, so quorum rules compose without a separate
//! group-of-groups type.

use quorum_store::{AccountRegistry, ReadTxn};
use quorum_types::{Address, GroupId, Weight};

use crate::meter::GasMeter;
use crate::registry::{load_group, GroupKeeper};
use crate::AuthError;

/// Descriptor charged when a group record is resolved.
pub const GAS_GROUP_AUTH: &str = "group auth";
/// Descriptor charged for each member/signer comparison.
pub const GAS_CHECK_ADDR: &str = "check addr";

impl<A: AccountRegistry> GroupKeeper<A> {
    /// Decide whether `signers` may act on behalf of `group`.
    ///
    /// Returns `Ok(false)` when `group` is malformed, unknown, or not satisfied.
    /// Returns an error only for conditions that must abort the enclosing
    /// transaction: an exhausted gas budget, nesting beyond
    /// [`AuthParams::max_depth`](quorum_types::AuthParams), weight overflow or
    /// a store failure.
    pub fn authorize<T, M>(
        &self,
        txn: &T,
        meter: &mut M,
        group: &Address,
        signers: &[Address],
    ) -> Result<bool, AuthError>
    where
        T: ReadTxn + ?Sized,
        M: GasMeter + ?Sized,
    {
        let result = self.authorize_at(txn, meter, group, signers, 0);
        match &result {
            Ok(authorized) => tracing::debug!(
                %group,
                signers = signers.len(),
                authorized,
                gas = meter.consumed(),
                "group authorization"
            ),
            Err(e) => tracing::warn!(%group, error = %e, "group authorization aborted"),
        }
        result
    }

    fn authorize_at<T, M>(
        &self,
        txn: &T,
        meter: &mut M,
        group: &Address,
        signers: &[Address],
        depth: u32,
    ) -> Result<bool, AuthError>
    where
        T: ReadTxn + ?Sized,
        M: GasMeter + ?Sized,
    {
        let Ok(id) = GroupId::try_from(group) else {
            return Ok(false);
        };
        let Some(info) = load_group(txn, &id)? else {
            return Ok(false);
        };
        if depth > self.params().max_depth {
            return Err(AuthError::DepthExceeded {
                group: id.to_string(),
                max_depth: self.params().max_depth,
            });
        }
        meter.consume(self.params().resolve_cost, GAS_GROUP_AUTH)?;

        let threshold = info.decision_threshold;
        if threshold == 0 {
            return Ok(true);
        }

        let mut votes: Weight = 0;
        for member in &info.members {
            for signer in signers {
                meter.consume(self.params().compare_cost, GAS_CHECK_ADDR)?;
                if *signer == member.address
                    || self.authorize_at(txn, meter, &member.address, signers, depth + 1)?
                {
                    votes = votes
                        .checked_add(member.weight)
                        .ok_or_else(|| AuthError::WeightOverflow(id.to_string()))?;
                    if votes >= threshold {
                        return Ok(true);
                    }
                    break;
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicGasMeter, InfiniteGasMeter};
    use quorum_nullables::NullStore;
    use quorum_store::codec::encode;
    use quorum_store::{keys, KvStore, WriteTxn};
    use quorum_types::{AuthParams, Group, Member, PublicKey};

    fn addr(n: u8) -> Address {
        Address::from_public_key(&PublicKey([n; 32]))
    }

    fn gid(seq: u64) -> Address {
        GroupId::from_seq(seq).into_address()
    }

    /// Write records directly, bypassing creation checks.
    fn raw_groups(store: &NullStore, groups: &[(u64, Group)]) {
        let mut txn = store.write_txn().unwrap();
        for (seq, group) in groups {
            txn.put(&keys::group_key(&GroupId::from_seq(*seq)), &encode(group).unwrap())
                .unwrap();
        }
        txn.commit().unwrap();
    }

    #[test]
    fn counts_gas_per_resolution_and_comparison() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[(0, Group::new(5, vec![Member::new(addr(1), 2), Member::new(addr(2), 3)]))],
        );
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();

        // member 1: signer 2 (miss), signer 1 (hit) -> 2 comparisons
        // member 2: signer 2 (hit) -> 1 comparison, threshold reached
        assert!(keeper
            .authorize(&txn, &mut meter, &gid(0), &[addr(2), addr(1)])
            .unwrap());
        assert_eq!(meter.consumed(), 10 + 3 * 10);
    }

    #[test]
    fn nested_group_is_evaluated_for_every_signer() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[
                (0, Group::new(1, vec![Member::new(addr(9), 1)])),
                (1, Group::new(1, vec![Member::new(gid(0), 1)])),
            ],
        );
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();
        let signers = [addr(1), addr(2), addr(3)];

        assert!(!keeper.authorize(&txn, &mut meter, &gid(1), &signers).unwrap());
        // Outer: resolve + 3 comparisons, each followed by a full inner
        // evaluation of resolve + 3 comparisons.
        assert_eq!(meter.consumed(), 10 + 3 * (10 + 40));
    }

    #[test]
    fn repeated_nested_evaluation_is_paid_for() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[
                (0, Group::new(1, vec![Member::new(addr(9), 1)])),
                (1, Group::new(1, vec![Member::new(gid(0), 1)])),
            ],
        );
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        // Enough for one inner evaluation, not for three.
        let mut meter = BasicGasMeter::new(100);
        let result = keeper.authorize(&txn, &mut meter, &gid(1), &[addr(1), addr(2), addr(3)]);
        assert!(matches!(result, Err(AuthError::BudgetExceeded { .. })));
    }

    #[test]
    fn unknown_and_malformed_groups_do_not_authorize() {
        let store = NullStore::new();
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = BasicGasMeter::new(1_000);
        for group in [Address::default(), addr(1), gid(3)] {
            assert!(!keeper.authorize(&txn, &mut meter, &group, &[addr(1)]).unwrap());
        }
        assert_eq!(meter.consumed(), 0);
    }

    #[test]
    fn exhausted_budget_aborts_instead_of_denying() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[(0, Group::new(3, vec![Member::new(addr(1), 1), Member::new(addr(2), 2)]))],
        );
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = BasicGasMeter::new(25);
        let err = keeper
            .authorize(&txn, &mut meter, &gid(0), &[addr(1), addr(2)])
            .unwrap_err();
        assert!(matches!(err, AuthError::BudgetExceeded { descriptor: GAS_CHECK_ADDR, .. }));
    }

    #[test]
    fn cyclic_records_hit_the_depth_limit() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[
                (0, Group::new(1, vec![Member::new(gid(1), 1)])),
                (1, Group::new(1, vec![Member::new(gid(0), 1)])),
            ],
        );
        let keeper = GroupKeeper::new(AuthParams {
            max_depth: 4,
            ..AuthParams::default()
        });
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();
        let err = keeper
            .authorize(&txn, &mut meter, &gid(0), &[addr(1)])
            .unwrap_err();
        assert!(matches!(err, AuthError::DepthExceeded { max_depth: 4, .. }));
    }

    #[test]
    fn nesting_up_to_the_limit_is_allowed() {
        let store = NullStore::new();
        // gid(0) is satisfied by addr(1); gid(n) delegates to gid(n - 1).
        let mut chain = vec![(0, Group::new(1, vec![Member::new(addr(1), 1)]))];
        for seq in 1..=3 {
            chain.push((seq, Group::new(1, vec![Member::new(gid(seq - 1), 1)])));
        }
        raw_groups(&store, &chain);
        let keeper = GroupKeeper::new(AuthParams {
            max_depth: 3,
            ..AuthParams::default()
        });
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();
        assert!(keeper.authorize(&txn, &mut meter, &gid(3), &[addr(1)]).unwrap());

        let shallow = GroupKeeper::new(AuthParams {
            max_depth: 2,
            ..AuthParams::default()
        });
        assert!(matches!(
            shallow.authorize(&txn, &mut meter, &gid(3), &[addr(1)]),
            Err(AuthError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn weight_overflow_is_fatal() {
        let store = NullStore::new();
        raw_groups(
            &store,
            &[(
                0,
                Group::new(
                    Weight::MAX,
                    vec![Member::new(addr(1), Weight::MAX - 1), Member::new(addr(2), 2)],
                ),
            )],
        );
        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();
        assert!(matches!(
            keeper.authorize(&txn, &mut meter, &gid(0), &[addr(1), addr(2)]),
            Err(AuthError::WeightOverflow(_))
        ));
    }

    #[test]
    fn corrupt_record_is_a_store_error() {
        let store = NullStore::new();
        let mut txn = store.write_txn().unwrap();
        txn.put(&keys::group_key(&GroupId::from_seq(0)), &[0xff]).unwrap();
        txn.commit().unwrap();

        let keeper = GroupKeeper::default();
        let txn = store.read_txn().unwrap();
        let mut meter = InfiniteGasMeter::new();
        assert!(matches!(
            keeper.authorize(&txn, &mut meter, &gid(0), &[addr(1)]),
            Err(AuthError::Store(_))
        ));
    }
}
