#![no_main]

use libfuzzer_sys::fuzz_target;
use quorum_types::{Address, GroupId};

// Any byte string either fails to parse or is the unique encoding of its
// sequence number.
fuzz_target!(|data: &[u8]| {
    let _ = quorum_types::group_id::decode_uvarint(data);

    let address = Address::new(data.to_vec());
    if let Ok(id) = GroupId::try_from(&address) {
        let canonical = GroupId::from_seq(id.seq());
        assert_eq!(canonical.as_bytes(), data);
    }
});
