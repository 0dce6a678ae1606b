//! Value encoding for everything persisted by the workspace.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a `u64` counter stored as 8 little-endian bytes.
pub fn decode_counter(bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| {
        StoreError::Corruption(format!("counter has unexpected byte length {}", bytes.len()))
    })?;
    Ok(u64::from_le_bytes(arr))
}

pub fn encode_counter(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}
