//! Key layout of the shared key-value space.
//!
//! ```text
//! meta/next_group_seq      -> u64 (little endian)
//! group/<group id bytes>   -> Group
//! acct/<address bytes>     -> Principal
//! ```

use quorum_types::{Address, GroupId};

/// Holds the sequence number the allocator will hand out next.
pub const NEXT_GROUP_SEQ: &[u8] = b"meta/next_group_seq";

pub const GROUP_PREFIX: &[u8] = b"group/";

pub const ACCOUNT_PREFIX: &[u8] = b"acct/";

pub fn group_key(id: &GroupId) -> Vec<u8> {
    prefixed(GROUP_PREFIX, id.as_bytes())
}

pub fn account_key(address: &Address) -> Vec<u8> {
    prefixed(ACCOUNT_PREFIX, address.as_bytes())
}

fn prefixed(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + body.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(body);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_is_prefixed_id() {
        let id = GroupId::from_seq(1);
        assert_eq!(group_key(&id), b"group/G\x01".to_vec());
    }

    #[test]
    fn group_and_account_keys_never_collide() {
        let id = GroupId::from_seq(9);
        assert_ne!(group_key(&id), account_key(id.as_address()));
    }
}
