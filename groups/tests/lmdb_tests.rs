//! Group lifecycle against the LMDB backend, including process restarts.

use quorum_groups::{allocator, BasicGasMeter, GenesisState, GroupError, GroupKeeper};
use quorum_store::{AccountRegistry, KvStore, WriteTxn};
use quorum_store_lmdb::environment::DEFAULT_MAP_SIZE;
use quorum_store_lmdb::LmdbEnvironment;
use quorum_types::{Address, Group, GroupId, Member, Principal, PublicKey, StandardAccount};

fn addr(n: u8) -> Address {
    Address::from_public_key(&PublicKey([n; 32]))
}

fn open(dir: &tempfile::TempDir) -> LmdbEnvironment {
    LmdbEnvironment::open(dir.path(), 4, DEFAULT_MAP_SIZE).unwrap()
}

fn solo(n: u8) -> Group {
    Group::new(1, vec![Member::new(addr(n), 1)])
}

#[test]
fn ids_keep_increasing_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let mut seen = Vec::new();

    for round in 0..3u8 {
        let env = open(&dir);
        let keeper = GroupKeeper::default();
        for n in 0..4u8 {
            seen.push(keeper.create_committed(&env, solo(round * 4 + n)).unwrap());
        }
    }

    assert_eq!(seen.len(), 12);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last().unwrap(), &GroupId::from_seq(11));
}

#[test]
fn records_and_principals_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let env = open(&dir);
        GroupKeeper::default().create_committed(&env, solo(1)).unwrap()
    };

    let env = open(&dir);
    let keeper = GroupKeeper::default();
    let txn = env.read_txn().unwrap();
    assert_eq!(keeper.get_group(&txn, id.as_address()).unwrap(), solo(1));
    let principal = keeper.accounts().get_account(&txn, id.as_address()).unwrap();
    assert!(matches!(principal, Some(Principal::Group(_))));

    let mut meter = BasicGasMeter::new(1_000);
    assert!(keeper
        .authorize(&txn, &mut meter, id.as_address(), &[addr(1)])
        .unwrap());
}

#[test]
fn uncommitted_creation_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);
    let keeper = GroupKeeper::default();
    {
        let mut txn = env.write_txn().unwrap();
        keeper.create_group(&mut txn, solo(1)).unwrap();
        // Dropped without commit.
    }
    let txn = env.read_txn().unwrap();
    assert_eq!(allocator::next_seq(&txn).unwrap(), 0);
    assert!(keeper.get_group(&txn, GroupId::from_seq(0).as_address()).is_err());
}

#[test]
fn squatted_id_fails_without_partial_state() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);
    let keeper = GroupKeeper::default();
    keeper.create_committed(&env, solo(1)).unwrap();

    let squatted = GroupId::from_seq(1).into_address();
    let mut txn = env.write_txn().unwrap();
    keeper
        .accounts()
        .set_account(&mut txn, &Principal::Standard(StandardAccount::new(squatted.clone())))
        .unwrap();
    txn.commit().unwrap();

    assert!(matches!(
        keeper.create_committed(&env, solo(2)),
        Err(GroupError::AlreadyExists(_))
    ));
    let txn = env.read_txn().unwrap();
    assert_eq!(allocator::next_seq(&txn).unwrap(), 1);
    assert!(matches!(
        keeper.get_group(&txn, &squatted),
        Err(GroupError::NotFound(_))
    ));
}

#[test]
fn genesis_then_export_roundtrips_through_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let genesis = GenesisState {
        groups: vec![
            solo(1),
            solo(2),
            Group::new(
                2,
                vec![
                    Member::new(GroupId::from_seq(0).into_address(), 1),
                    Member::new(GroupId::from_seq(1).into_address(), 1),
                ],
            ),
        ],
    };
    {
        let env = open(&dir);
        GroupKeeper::default().apply_genesis(&env, &genesis).unwrap();
    }
    let env = open(&dir);
    let keeper = GroupKeeper::default();
    let txn = env.read_txn().unwrap();
    assert_eq!(keeper.export_genesis(&txn).unwrap(), genesis);

    let mut meter = BasicGasMeter::new(10_000);
    let council = GroupId::from_seq(2);
    assert!(keeper
        .authorize(&txn, &mut meter, council.as_address(), &[addr(1), addr(2)])
        .unwrap());
    assert!(!keeper
        .authorize(&txn, &mut meter, council.as_address(), &[addr(1)])
        .unwrap());
}

#[test]
fn update_commits_with_caller_transaction() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);
    let keeper = GroupKeeper::default();
    let id = keeper.create_committed(&env, solo(1)).unwrap();

    let mut txn = env.write_txn().unwrap();
    let mut meter = BasicGasMeter::new(10_000);
    keeper
        .update_group(&mut txn, &mut meter, id.as_address(), &[addr(1)], solo(2))
        .unwrap();
    txn.commit().unwrap();

    let txn = env.read_txn().unwrap();
    assert_eq!(keeper.get_group(&txn, id.as_address()).unwrap(), solo(2));
}
