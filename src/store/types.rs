//! Type wrappers for store keys and values
//!
//! Keys are fixed-width big-endian integers so sled's byte ordering matches
//! insertion order. Values are bincode encoded through serde.
//!
//! # Types
//!
//! - **`SetKey`**: Sequence number of a record set in the `sets` tree
//! - **`GroupKey`**: 1-based ordinal of a group in the `groups` tree

use super::error::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key of a record set: its load sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SetKey(pub u64);

impl SetKey {
    pub const TREE: &'static str = "sets";

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// # Errors
    ///
    /// Returns `StoreError::CorruptKey` if the key is not 8 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|_| StoreError::CorruptKey { tree: Self::TREE })?;
        Ok(Self(u64::from_be_bytes(raw)))
    }
}

/// Key of a group: its 1-based ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey(pub u32);

impl GroupKey {
    pub const TREE: &'static str = "groups";

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// # Errors
    ///
    /// Returns `StoreError::CorruptKey` if the key is not 4 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let raw: [u8; 4] = bytes
            .try_into()
            .map_err(|_| StoreError::CorruptKey { tree: Self::TREE })?;
        Ok(Self(u32::from_be_bytes(raw)))
    }
}

/// Encode a value for storage
///
/// # Errors
///
/// Returns `StoreError::EncodeError` if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

/// Decode a stored value
///
/// # Errors
///
/// Returns `StoreError::DecodeError` if the bytes do not hold a `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    let (value, _): (T, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}
