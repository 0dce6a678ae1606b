//! Group identifiers: a reserved tag byte followed by a uvarint sequence number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::address::Address;
use crate::error::TypesError;

/// Maximum number of bytes a uvarint-encoded `u64` occupies.
pub const MAX_UVARINT_LEN: usize = 10;

/// Address of a group principal.
///
/// Layout: `GroupId::TAG` followed by the unsigned LEB128 encoding of the
/// allocator's sequence number. Only canonical encodings with no trailing
/// bytes are accepted, so every `GroupId` maps to exactly one sequence number.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GroupId {
    seq: u64,
    address: Address,
}

impl GroupId {
    /// Leading byte reserved for group addresses.
    pub const TAG: u8 = b'G';

    /// Build the identifier for allocator sequence number `seq`.
    pub fn from_seq(seq: u64) -> Self {
        let mut bytes = Vec::with_capacity(1 + MAX_UVARINT_LEN);
        bytes.push(Self::TAG);
        encode_uvarint(seq, &mut bytes);
        Self {
            seq,
            address: Address::new(bytes),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn as_address(&self) -> &Address {
        &self.address
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.address.as_bytes()
    }

    pub fn into_address(self) -> Address {
        self.address
    }
}

impl TryFrom<&Address> for GroupId {
    type Error = TypesError;

    fn try_from(address: &Address) -> Result<Self, Self::Error> {
        let bytes = address.as_bytes();
        match bytes.split_first() {
            None => Err(TypesError::InvalidIdentifier("empty address".into())),
            Some((&tag, _)) if tag != Self::TAG => Err(TypesError::InvalidIdentifier(format!(
                "{address} is not a group address"
            ))),
            Some((_, rest)) => {
                let (seq, used) = decode_uvarint(rest).ok_or_else(|| {
                    TypesError::InvalidIdentifier(format!("{address} has a malformed sequence"))
                })?;
                if used != rest.len() {
                    return Err(TypesError::InvalidIdentifier(format!(
                        "{address} has trailing bytes"
                    )));
                }
                Ok(Self {
                    seq,
                    address: address.clone(),
                })
            }
        }
    }
}

impl TryFrom<Address> for GroupId {
    type Error = TypesError;

    fn try_from(address: Address) -> Result<Self, Self::Error> {
        GroupId::try_from(&address)
    }
}

impl From<GroupId> for Address {
    fn from(id: GroupId) -> Self {
        id.address
    }
}

impl PartialOrd for GroupId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq.cmp(&other.seq)
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.seq)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.address.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let address = Address::deserialize(deserializer)?;
        GroupId::try_from(address).map_err(serde::de::Error::custom)
    }
}

/// Append the unsigned LEB128 encoding of `value` to `out`.
pub fn encode_uvarint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Decode a canonical unsigned LEB128 value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` if the input
/// is truncated, overflows 64 bits, or carries redundant trailing zero groups.
pub fn decode_uvarint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_UVARINT_LEN) {
        let low = (byte & 0x7f) as u64;
        if i == MAX_UVARINT_LEN - 1 && byte > 1 {
            return None;
        }
        value |= low << (7 * i);
        if byte & 0x80 == 0 {
            // A zero final group after the first byte is a non-minimal encoding.
            if i > 0 && byte == 0 {
                return None;
            }
            return Some((value, i + 1));
        }
    }
    None
}
