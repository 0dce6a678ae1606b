#![no_main]

use libfuzzer_sys::fuzz_target;
use quorum_store::codec::{decode, decode_counter};
use quorum_types::{Group, Principal};

// Stored records come back from disk as raw bytes; decoding must never panic.
fuzz_target!(|data: &[u8]| {
    let _ = decode::<Group>(data);
    let _ = decode::<Principal>(data);
    let _ = decode_counter(data);

    if let Ok(group) = bincode::deserialize::<Group>(data) {
        let _ = group.total_weight();
        let _ = group.subgroups().count();
    }
});
