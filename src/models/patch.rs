//! Serde helpers for update payloads.
//!
//! An update distinguishes three states per column: key absent (leave the
//! column alone), `null` (clear it) and a value (set it). Nullable columns
//! use `Option<Option<T>>` with [`nullable`]; columns that must never be
//! null use `Option<T>` with [`required`], which rejects an explicit `null`
//! instead of reading it as "absent".

use serde::{Deserialize, Deserializer};

/// `null` becomes `Some(None)`; a missing key stays `None` through
/// `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A present key must carry a value.
pub fn required<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
